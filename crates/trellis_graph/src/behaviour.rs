// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notification hooks for graphs and groups.
//!
//! Behaviours are observers attached to a [`Graph`] or to a [`Group`](crate::Group).
//! They are kept in a [`Behaviours`] list and called synchronously, in
//! registration order, once a mutation has restored every graph invariant.
//!
//! Graph behaviours only get a shared reference to the graph: they can
//! observe anything but can't start another mutation from a callback.

use crate::container::Entries;
use crate::edge::{Edge, EdgeId};
use crate::graph::Graph;
use crate::group::{GroupAdjacency, GroupId};
use crate::node::{Node, NodeId};
use indexmap::IndexMap;
use std::fmt;

struct BehaviourSlot<B: ?Sized> {
    name: String,
    enabled: bool,
    behaviour: Box<B>,
}

/// Ordered list of named behaviours that can be enabled individually
pub struct Behaviours<B: ?Sized> {
    slots: Vec<BehaviourSlot<B>>,
}

impl<B: ?Sized> Behaviours<B> {
    /// Create an empty list
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append a behaviour; it is called after every behaviour already registered.
    ///
    /// Names are unique: if `name` is taken the behaviour is dropped and
    /// false is returned.
    pub fn add(&mut self, name: impl Into<String>, behaviour: Box<B>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            tracing::warn!("A behaviour named {name} is already registered, new one dropped");
            return false;
        }
        self.slots.push(BehaviourSlot {
            name,
            enabled: true,
            behaviour,
        });
        true
    }

    /// Whether a behaviour is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s.name == name)
    }

    /// Detach the behaviour registered under `name`
    pub fn remove(&mut self, name: &str) -> Option<Box<B>> {
        let index = self.slots.iter().position(|s| s.name == name)?;
        Some(self.slots.remove(index).behaviour)
    }

    /// Get a behaviour by name
    pub fn get(&self, name: &str) -> Option<&B> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.behaviour.as_ref())
    }

    /// Enable or disable a behaviour, returning false if no behaviour has that name
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.slots.iter_mut().find(|s| s.name == name) {
            Some(slot) => {
                slot.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Whether a behaviour is enabled (`None` if unknown)
    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.slots.iter().find(|s| s.name == name).map(|s| s.enabled)
    }

    /// Enable every behaviour
    pub fn enable_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = true;
        }
    }

    /// Disable every behaviour
    pub fn disable_all(&mut self) {
        for slot in &mut self.slots {
            slot.enabled = false;
        }
    }

    /// Behaviour names in call order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.name.as_str())
    }

    /// Number of registered behaviours
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no behaviour is registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Detach every behaviour
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Call `f` on every enabled behaviour in registration order
    pub fn notify(&mut self, mut f: impl FnMut(&mut B)) {
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            f(slot.behaviour.as_mut());
        }
    }
}

impl<B: ?Sized> Default for Behaviours<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized> fmt::Debug for Behaviours<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|s| (&s.name, s.enabled)))
            .finish()
    }
}

/// Observer of graph topology changes.
///
/// Every callback defaults to doing nothing.
///
/// The graph behaviour list is detached from the graph while its
/// behaviours are notified: inside a callback [`Graph::behaviours`] is
/// empty. Group behaviours are unaffected.
#[allow(unused_variables)]
pub trait GraphBehaviour {
    /// A node has been created or inserted
    fn node_inserted(&mut self, graph: &Graph, node: NodeId) {}

    /// A node has been removed (it is no longer in `graph`)
    fn node_removed(&mut self, graph: &Graph, node: NodeId) {}

    /// A node property has been changed through the graph
    fn node_modified(&mut self, graph: &Graph, node: NodeId) {}

    /// `edge` has been registered as an in edge of `node`
    fn in_edge_inserted(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {}

    /// `edge` has been unregistered from `node` in edges
    fn in_edge_removed(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {}

    /// `edge` has been registered as an out edge of `node`
    fn out_edge_inserted(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {}

    /// `edge` has been unregistered from `node` out edges
    fn out_edge_removed(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {}

    /// An edge has been created or inserted
    fn edge_inserted(&mut self, graph: &Graph, edge: EdgeId) {}

    /// An edge between `src` and `dst` has been removed
    fn edge_removed(&mut self, graph: &Graph, edge: EdgeId, src: NodeId, dst: NodeId) {}

    /// An edge property has been changed through the graph
    fn edge_modified(&mut self, graph: &Graph, edge: EdgeId) {}

    /// A group has been created or inserted
    fn group_inserted(&mut self, graph: &Graph, group: GroupId) {}

    /// A group has been removed
    fn group_removed(&mut self, graph: &Graph, group: GroupId) {}

    /// A group property has been changed through the graph
    fn group_modified(&mut self, graph: &Graph, group: GroupId) {}

    /// `node` joined `group`
    fn node_grouped(&mut self, graph: &Graph, group: GroupId, node: NodeId) {}

    /// `node` left `group`
    fn node_ungrouped(&mut self, graph: &Graph, group: GroupId, node: NodeId) {}

    /// The graph has been cleared
    fn graph_cleared(&mut self, graph: &Graph) {}
}

/// View of the topology handed to group behaviours
pub struct GroupContext<'a> {
    /// Group being notified
    pub group: GroupId,
    /// Every node in the graph
    pub nodes: &'a IndexMap<NodeId, Node>,
    /// Every edge in the graph
    pub edges: &'a IndexMap<EdgeId, Edge>,
    /// Current group members
    pub members: &'a Entries<NodeId>,
    /// Group internal and adjacent edge sets
    pub adjacency: &'a mut GroupAdjacency,
}

impl GroupContext<'_> {
    /// Whether `node` is a member of the group
    pub fn is_member(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Put `edge` in the internal set, the adjacent set or neither,
    /// depending on how many of its endpoints are members.
    pub fn classify_edge(&mut self, edge: EdgeId) {
        let Some((src, dst)) = self.edges.get(&edge).and_then(Edge::endpoints) else {
            self.adjacency.forget(edge);
            return;
        };
        match (self.is_member(src), self.is_member(dst)) {
            (true, true) => {
                self.adjacency.adjacent_edges.shift_remove(&edge);
                self.adjacency.edges.insert(edge);
            }
            (true, false) | (false, true) => {
                self.adjacency.edges.shift_remove(&edge);
                self.adjacency.adjacent_edges.insert(edge);
            }
            (false, false) => self.adjacency.forget(edge),
        }
    }
}

/// Observer of group membership and of edges touching group members.
#[allow(unused_variables)]
pub trait GroupBehaviour {
    /// `node` has joined the group
    fn node_inserted(&mut self, ctx: GroupContext<'_>, node: NodeId) {}

    /// `node` has left the group (it is no longer in `ctx.members`)
    fn node_removed(&mut self, ctx: GroupContext<'_>, node: NodeId) {}

    /// An edge touching at least one member has been inserted
    fn edge_inserted(&mut self, ctx: GroupContext<'_>, edge: EdgeId) {}

    /// An edge touching at least one member is being removed
    fn edge_removed(&mut self, ctx: GroupContext<'_>, edge: EdgeId) {}
}

/// Keeps a group internal and adjacent edge sets up to date.
///
/// An edge with both endpoints in the group is internal, an edge with
/// exactly one endpoint in the group is adjacent.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupAdjacentEdgesBehaviour;

impl GroupAdjacentEdgesBehaviour {
    /// Name used when the graph installs this behaviour on a group
    pub const NAME: &'static str = "group_adjacent_edges";

    fn reclassify_incident(mut ctx: GroupContext<'_>, node: NodeId) {
        let incident: Vec<EdgeId> = match ctx.nodes.get(&node) {
            Some(n) => n.incident_edges().collect(),
            None => return,
        };
        for edge in incident {
            ctx.classify_edge(edge);
        }
    }
}

impl GroupBehaviour for GroupAdjacentEdgesBehaviour {
    fn node_inserted(&mut self, ctx: GroupContext<'_>, node: NodeId) {
        Self::reclassify_incident(ctx, node);
    }

    fn node_removed(&mut self, ctx: GroupContext<'_>, node: NodeId) {
        Self::reclassify_incident(ctx, node);
    }

    fn edge_inserted(&mut self, mut ctx: GroupContext<'_>, edge: EdgeId) {
        ctx.classify_edge(edge);
    }

    fn edge_removed(&mut self, ctx: GroupContext<'_>, edge: EdgeId) {
        ctx.adjacency.forget(edge);
    }
}

/// Graph behaviour tracing every notification at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingBehaviour;

impl GraphBehaviour for LoggingBehaviour {
    fn node_inserted(&mut self, graph: &Graph, node: NodeId) {
        tracing::debug!(graph = %graph.name(), "node inserted: {node}");
    }

    fn node_removed(&mut self, graph: &Graph, node: NodeId) {
        tracing::debug!(graph = %graph.name(), "node removed: {node}");
    }

    fn node_modified(&mut self, graph: &Graph, node: NodeId) {
        tracing::debug!(graph = %graph.name(), "node modified: {node}");
    }

    fn in_edge_inserted(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {
        tracing::trace!(graph = %graph.name(), "in edge {edge} inserted on {node}");
    }

    fn in_edge_removed(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {
        tracing::trace!(graph = %graph.name(), "in edge {edge} removed from {node}");
    }

    fn out_edge_inserted(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {
        tracing::trace!(graph = %graph.name(), "out edge {edge} inserted on {node}");
    }

    fn out_edge_removed(&mut self, graph: &Graph, node: NodeId, edge: EdgeId) {
        tracing::trace!(graph = %graph.name(), "out edge {edge} removed from {node}");
    }

    fn edge_inserted(&mut self, graph: &Graph, edge: EdgeId) {
        tracing::debug!(graph = %graph.name(), "edge inserted: {edge}");
    }

    fn edge_removed(&mut self, graph: &Graph, edge: EdgeId, src: NodeId, dst: NodeId) {
        tracing::debug!(graph = %graph.name(), "edge removed: {edge} ({src} -> {dst})");
    }

    fn edge_modified(&mut self, graph: &Graph, edge: EdgeId) {
        tracing::debug!(graph = %graph.name(), "edge modified: {edge}");
    }

    fn group_inserted(&mut self, graph: &Graph, group: GroupId) {
        tracing::debug!(graph = %graph.name(), "group inserted: {group}");
    }

    fn group_removed(&mut self, graph: &Graph, group: GroupId) {
        tracing::debug!(graph = %graph.name(), "group removed: {group}");
    }

    fn group_modified(&mut self, graph: &Graph, group: GroupId) {
        tracing::debug!(graph = %graph.name(), "group modified: {group}");
    }

    fn node_grouped(&mut self, graph: &Graph, group: GroupId, node: NodeId) {
        tracing::debug!(graph = %graph.name(), "{node} joined {group}");
    }

    fn node_ungrouped(&mut self, graph: &Graph, group: GroupId, node: NodeId) {
        tracing::debug!(graph = %graph.name(), "{node} left {group}");
    }

    fn graph_cleared(&mut self, graph: &Graph) {
        tracing::debug!(graph = %graph.name(), "graph cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    trait Ping {
        fn ping(&mut self);
    }

    struct Counter(Rc<RefCell<Vec<&'static str>>>, &'static str);

    impl Ping for Counter {
        fn ping(&mut self) {
            self.0.borrow_mut().push(self.1);
        }
    }

    fn counters() -> (Behaviours<dyn Ping>, Rc<RefCell<Vec<&'static str>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut behaviours: Behaviours<dyn Ping> = Behaviours::new();
        behaviours.add("first", Box::new(Counter(log.clone(), "first")));
        behaviours.add("second", Box::new(Counter(log.clone(), "second")));
        (behaviours, log)
    }

    #[test]
    fn test_registration_order_is_call_order() {
        let (mut behaviours, log) = counters();
        behaviours.notify(|b| b.ping());
        assert_eq!(*log.borrow(), vec!["first", "second"]);
        assert_eq!(behaviours.names().collect::<Vec<_>>(), vec!["first", "second"]);
    }

    #[test]
    fn test_disabled_behaviour_is_skipped() {
        let (mut behaviours, log) = counters();
        assert!(behaviours.set_enabled("first", false));
        assert!(!behaviours.set_enabled("missing", false));
        behaviours.notify(|b| b.ping());
        assert_eq!(*log.borrow(), vec!["second"]);
        assert_eq!(behaviours.is_enabled("first"), Some(false));

        behaviours.disable_all();
        behaviours.notify(|b| b.ping());
        assert_eq!(log.borrow().len(), 1);

        behaviours.enable_all();
        behaviours.notify(|b| b.ping());
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let (mut behaviours, log) = counters();
        assert!(!behaviours.add("first", Box::new(Counter(log.clone(), "again"))));
        assert!(behaviours.contains("first"));
        assert_eq!(behaviours.len(), 2);

        behaviours.notify(|b| b.ping());
        assert_eq!(*log.borrow(), vec!["first", "second"]);

        assert!(behaviours.remove("first").is_some());
        assert!(!behaviours.contains("first"));
        assert!(behaviours.add("first", Box::new(Counter(log.clone(), "again"))));
        assert_eq!(behaviours.names().collect::<Vec<_>>(), vec!["second", "first"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut behaviours, _log) = counters();
        assert!(behaviours.remove("first").is_some());
        assert!(behaviours.remove("first").is_none());
        assert_eq!(behaviours.len(), 1);
        behaviours.clear();
        assert!(behaviours.is_empty());
    }
}
