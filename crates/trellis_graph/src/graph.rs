// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph owning nodes, edges and groups.

use crate::behaviour::{Behaviours, GraphBehaviour, GroupBehaviour, GroupContext};
use crate::class::ClassRegistry;
use crate::config::GraphConfig;
use crate::edge::{Edge, EdgeId, DEFAULT_EDGE_CLASS};
use crate::error::{Result, TopologyError};
use crate::group::{Group, GroupId, DEFAULT_GROUP_CLASS};
use crate::node::{Node, NodeId, DEFAULT_NODE_CLASS};
use crate::properties::{NullProperties, PropertyAccessor, ShapeProperties};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a graph, used as the owner back-reference of its primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

impl GraphId {
    /// Create a new random graph ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

/// A directed graph with node groups.
///
/// The graph is the only owner of its primitives. They are stored in
/// insertion order and addressed by id; ids are never reused, so an id kept
/// after a removal simply resolves to nothing.
///
/// On top of the primary collections the graph maintains a root node cache
/// (nodes with no in edge). Every mutation keeps it exact; node in degree
/// is the source of truth and [`Graph::is_root_node`] reports any drift.
pub struct Graph {
    id: GraphId,
    config: GraphConfig,
    nodes: IndexMap<NodeId, Node>,
    root_nodes: IndexSet<NodeId>,
    edges: IndexMap<EdgeId, Edge>,
    groups: IndexMap<GroupId, Group>,
    behaviours: Behaviours<dyn GraphBehaviour>,
    properties: Box<dyn PropertyAccessor>,
    node_classes: ClassRegistry<Node>,
    edge_classes: ClassRegistry<Edge>,
    group_classes: ClassRegistry<Group>,
}

impl Graph {
    /// Create an empty graph with the default configuration
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty graph
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            id: GraphId::new(),
            config,
            nodes: IndexMap::new(),
            root_nodes: IndexSet::new(),
            edges: IndexMap::new(),
            groups: IndexMap::new(),
            behaviours: Behaviours::new(),
            properties: Box::new(NullProperties),
            node_classes: ClassRegistry::new(DEFAULT_NODE_CLASS),
            edge_classes: ClassRegistry::new(DEFAULT_EDGE_CLASS),
            group_classes: ClassRegistry::new(DEFAULT_GROUP_CLASS),
        }
    }

    /// Route property reads and writes to `properties`
    pub fn with_properties(mut self, properties: impl PropertyAccessor + 'static) -> Self {
        self.properties = Box::new(properties);
        self
    }

    /// Graph identifier
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Graph name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Configuration the graph was built with
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Remove every node (with its edges and group membership), then every group.
    ///
    /// Behaviours are notified for each removal, then receive
    /// [`GraphBehaviour::graph_cleared`]. They stay attached; disable them
    /// first to skip per-primitive notifications.
    pub fn clear(&mut self) {
        let node_ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        for node in node_ids {
            if let Err(e) = self.remove_node(node) {
                tracing::warn!(graph = %self.name(), "Failed to remove {node} while clearing: {e}");
            }
        }
        let group_ids: Vec<GroupId> = self.groups.keys().copied().collect();
        for group in group_ids {
            if let Err(e) = self.remove_group(group) {
                tracing::warn!(graph = %self.name(), "Failed to remove {group} while clearing: {e}");
            }
        }
        self.root_nodes.clear();
        self.notify(|b, g| b.graph_cleared(g));
    }

    // Behaviours -------------------------------------------------------------

    /// Attach a behaviour, called after those already attached.
    ///
    /// Returns false, dropping `behaviour`, if `name` is already taken.
    pub fn add_behaviour(&mut self, name: impl Into<String>, behaviour: impl GraphBehaviour + 'static) -> bool {
        self.behaviours.add(name, Box::new(behaviour))
    }

    /// Graph behaviours.
    ///
    /// Empty when called from a [`GraphBehaviour`] callback, since the list
    /// is detached while it is being notified.
    pub fn behaviours(&self) -> &Behaviours<dyn GraphBehaviour> {
        &self.behaviours
    }

    /// Mutable access to graph behaviours (enable, disable, detach)
    pub fn behaviours_mut(&mut self) -> &mut Behaviours<dyn GraphBehaviour> {
        &mut self.behaviours
    }

    fn notify(&mut self, mut f: impl FnMut(&mut (dyn GraphBehaviour + 'static), &Graph)) {
        if self.behaviours.is_empty() {
            return;
        }
        // Detached for the call so behaviours can borrow the whole graph
        let mut behaviours = std::mem::take(&mut self.behaviours);
        let graph: &Graph = self;
        behaviours.notify(|b| f(b, graph));
        self.behaviours = behaviours;
    }

    fn notify_group(
        &mut self,
        group: GroupId,
        mut f: impl FnMut(&mut (dyn GroupBehaviour + 'static), GroupContext<'_>),
    ) {
        let nodes = &self.nodes;
        let edges = &self.edges;
        let Some(target) = self.groups.get_mut(&group) else {
            return;
        };
        let members = &target.members;
        let adjacency = &mut target.adjacency;
        target.behaviours.notify(|b| {
            f(
                b,
                GroupContext {
                    group,
                    nodes,
                    edges,
                    members,
                    adjacency: &mut *adjacency,
                },
            );
        });
    }

    /// Groups owning `src` or `dst`, without duplicates
    fn groups_of(&self, src: NodeId, dst: NodeId) -> Vec<GroupId> {
        let mut groups = Vec::with_capacity(2);
        for node in [src, dst] {
            if let Some(group) = self.nodes.get(&node).and_then(Node::group) {
                if !groups.contains(&group) {
                    groups.push(group);
                }
            }
        }
        groups
    }

    // Classes ----------------------------------------------------------------

    /// Make `class_name` available to [`Graph::create_node_of_class`]
    pub fn register_node_class(&mut self, class_name: impl Into<String>, init: impl Fn(&mut Node) + 'static) {
        self.node_classes.register(class_name, init);
    }

    /// Make `class_name` available to [`Graph::create_edge_of_class`]
    pub fn register_edge_class(&mut self, class_name: impl Into<String>, init: impl Fn(&mut Edge) + 'static) {
        self.edge_classes.register(class_name, init);
    }

    /// Make `class_name` available to [`Graph::create_group_of_class`]
    pub fn register_group_class(&mut self, class_name: impl Into<String>, init: impl Fn(&mut Group) + 'static) {
        self.group_classes.register(class_name, init);
    }

    /// Node class table
    pub fn node_classes(&self) -> &ClassRegistry<Node> {
        &self.node_classes
    }

    /// Edge class table
    pub fn edge_classes(&self) -> &ClassRegistry<Edge> {
        &self.edge_classes
    }

    /// Group class table
    pub fn group_classes(&self) -> &ClassRegistry<Group> {
        &self.group_classes
    }

    // Nodes ------------------------------------------------------------------

    /// Create a node and insert it in the graph
    pub fn create_node(&mut self) -> NodeId {
        self.attach_node(Node::new())
    }

    /// Create a node of a registered class and insert it in the graph
    pub fn create_node_of_class(&mut self, class_name: &str) -> Result<NodeId> {
        let node = self
            .node_classes
            .instantiate(class_name, || Node::with_class(class_name))?;
        Ok(self.attach_node(node))
    }

    /// Give the graph ownership of a node built outside of it.
    ///
    /// The node must not have edges or a group yet.
    pub fn insert_node(&mut self, node: Node) -> Result<NodeId> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(TopologyError::DuplicateNode(id));
        }
        if node.in_degree() > 0 || node.out_degree() > 0 {
            return Err(TopologyError::NodeHasEdges(id));
        }
        if let Some(group) = node.group() {
            return Err(TopologyError::NodeAlreadyGrouped { node: id, group });
        }
        Ok(self.attach_node(node))
    }

    fn attach_node(&mut self, mut node: Node) -> NodeId {
        node.set_container_kind(self.config.adjacency);
        node.owner = Some(self.id);
        let id = node.id();
        self.nodes.insert(id, node);
        self.root_nodes.insert(id);
        self.notify(|b, g| b.node_inserted(g, id));
        id
    }

    /// Remove a node.
    ///
    /// Incident edges are removed first, then the node leaves its group,
    /// then it is erased from every index. Complexity is linear in the
    /// node count.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        let target = self.nodes.get(&node).ok_or(TopologyError::NodeNotFound(node))?;
        // Self loops are listed twice
        let incident: Vec<EdgeId> = target.incident_edges().collect();
        let group = target.group();

        for edge in incident {
            if self.edges.contains_key(&edge) {
                self.remove_edge(edge)?;
            }
        }
        if let Some(group) = group {
            self.remove_node_from_group(group, node)?;
        }

        if let Some(mut removed) = self.nodes.shift_remove(&node) {
            removed.owner = None;
        }
        self.root_nodes.shift_remove(&node);
        self.properties.release_node(node);
        self.notify(|b, g| b.node_removed(g, node));
        Ok(())
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of root nodes (nodes with a zero in degree)
    pub fn root_node_count(&self) -> usize {
        self.root_nodes.len()
    }

    /// Put `node` in the root node cache.
    ///
    /// Only needed after editing the topology outside of the graph methods.
    pub fn install_root_node(&mut self, node: NodeId) -> Result<()> {
        let in_degree = self.in_degree(node)?;
        if in_degree != 0 {
            return Err(TopologyError::NotARootNode { node, in_degree });
        }
        self.root_nodes.insert(node);
        Ok(())
    }

    /// Whether `node` is a root node.
    ///
    /// Checks both the root cache and the node in degree, and fails with
    /// [`TopologyError::RootCacheMismatch`] if they disagree.
    pub fn is_root_node(&self, node: NodeId) -> Result<bool> {
        let in_degree = self.in_degree(node)?;
        let cached = self.root_nodes.contains(&node);
        if cached != (in_degree == 0) {
            return Err(TopologyError::RootCacheMismatch { node, cached, in_degree });
        }
        Ok(cached)
    }

    /// Recompute the root node cache from node in degrees, returning the number of corrected entries
    pub fn rebuild_root_cache(&mut self) -> usize {
        let roots: IndexSet<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.in_degree() == 0)
            .map(Node::id)
            .collect();
        let corrected = roots.symmetric_difference(&self.root_nodes).count();
        if corrected > 0 {
            tracing::debug!(graph = %self.name(), "Root node cache rebuilt, {corrected} entries corrected");
        }
        self.root_nodes = roots;
        corrected
    }

    /// Root nodes, in cache order
    pub fn root_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root_nodes.iter().copied()
    }

    /// Whether `node` belongs to this graph
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Get a node by ID
    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(&node)
    }

    /// All nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node IDs, in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    fn in_degree(&self, node: NodeId) -> Result<usize> {
        self.nodes
            .get(&node)
            .map(Node::in_degree)
            .ok_or(TopologyError::NodeNotFound(node))
    }

    /// Include or exclude a node from serialization (no behaviour is notified)
    pub fn set_node_serializable(&mut self, node: NodeId, serializable: bool) -> Result<()> {
        self.nodes
            .get_mut(&node)
            .ok_or(TopologyError::NodeNotFound(node))?
            .set_serializable(serializable);
        Ok(())
    }

    // Edges ------------------------------------------------------------------

    /// Create a directed edge from `src` to `dst`. Complexity is O(1).
    pub fn create_edge(&mut self, src: NodeId, dst: NodeId) -> Result<EdgeId> {
        self.create_edge_of_class(DEFAULT_EDGE_CLASS, src, dst)
    }

    /// Create a directed edge of a registered class from `src` to `dst`
    pub fn create_edge_of_class(&mut self, class_name: &str, src: NodeId, dst: NodeId) -> Result<EdgeId> {
        self.check_endpoints(src, dst)?;
        let edge = self
            .edge_classes
            .instantiate(class_name, || Edge::with_class(class_name, src, dst))?;
        self.attach_edge(edge)
    }

    /// Give the graph ownership of an edge built outside of it.
    ///
    /// Both endpoints must be set and belong to this graph.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        self.attach_edge(edge)
    }

    fn check_endpoints(&self, src: NodeId, dst: NodeId) -> Result<()> {
        for node in [src, dst] {
            if !self.nodes.contains_key(&node) {
                return Err(TopologyError::NodeNotFound(node));
            }
        }
        Ok(())
    }

    fn attach_edge(&mut self, mut edge: Edge) -> Result<EdgeId> {
        let id = edge.id();
        let (src, dst) = edge.endpoints().ok_or(TopologyError::InvalidEdge(id))?;
        self.check_endpoints(src, dst)?;
        if self.edges.contains_key(&id) {
            return Err(TopologyError::DuplicateEdge(id));
        }

        if let Some(source) = self.nodes.get_mut(&src) {
            source.add_out_edge(&mut edge)?;
        }
        if let Some(destination) = self.nodes.get_mut(&dst) {
            destination.add_in_edge(&mut edge)?;
        }
        self.root_nodes.shift_remove(&dst);
        edge.owner = Some(self.id);
        self.edges.insert(id, edge);

        for group in self.groups_of(src, dst) {
            self.notify_group(group, |b, ctx| b.edge_inserted(ctx, id));
        }
        self.notify(|b, g| {
            b.out_edge_inserted(g, src, id);
            b.in_edge_inserted(g, dst, id);
            b.edge_inserted(g, id);
        });
        Ok(id)
    }

    /// Remove a specific edge. Worst case complexity is O(edge count).
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<()> {
        let target = self.edges.get(&edge).ok_or(TopologyError::EdgeNotFound(edge))?;
        let (src, dst) = target.endpoints().ok_or(TopologyError::InvalidEdge(edge))?;

        for group in self.groups_of(src, dst) {
            self.notify_group(group, |b, ctx| b.edge_removed(ctx, edge));
        }

        let target = &self.edges[&edge];
        if let Some(source) = self.nodes.get_mut(&src) {
            source.remove_out_edge(target)?;
        }
        if let Some(destination) = self.nodes.get_mut(&dst) {
            destination.remove_in_edge(target)?;
            if destination.in_degree() == 0 {
                self.root_nodes.insert(dst);
            }
        }
        if let Some(mut removed) = self.edges.shift_remove(&edge) {
            removed.owner = None;
        }
        self.properties.release_edge(edge);

        self.notify(|b, g| {
            b.out_edge_removed(g, src, edge);
            b.in_edge_removed(g, dst, edge);
            b.edge_removed(g, edge, src, dst);
        });
        Ok(())
    }

    /// Remove the first edge found from `src` to `dst`.
    ///
    /// Parallel edges are left in place. Worst case complexity is O(edge count).
    pub fn remove_edge_between(&mut self, src: NodeId, dst: NodeId) -> Result<()> {
        self.check_endpoints(src, dst)?;
        let edge = self
            .find_edge(src, dst)
            .ok_or(TopologyError::NoEdgeBetween { src, dst })?;
        self.remove_edge(edge)
    }

    /// Remove every edge from `src` to `dst`, returning how many were removed
    pub fn remove_all_edges_between(&mut self, src: NodeId, dst: NodeId) -> Result<usize> {
        self.check_endpoints(src, dst)?;
        let matching: Vec<EdgeId> = self.edges_between(src, dst).collect();
        if matching.is_empty() {
            return Err(TopologyError::NoEdgeBetween { src, dst });
        }
        for edge in &matching {
            self.remove_edge(*edge)?;
        }
        Ok(matching.len())
    }

    fn edges_between(&self, src: NodeId, dst: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.nodes
            .get(&src)
            .into_iter()
            .flat_map(|n| n.out_edges().iter())
            .copied()
            .filter(move |e| self.edges.get(e).and_then(Edge::dst) == Some(dst))
    }

    /// First edge from `src` to `dst`. Worst case complexity is O(edge count).
    pub fn find_edge(&self, src: NodeId, dst: NodeId) -> Option<EdgeId> {
        self.edges_between(src, dst).next()
    }

    /// Whether a direct edge exists from `src` to `dst`
    pub fn has_edge(&self, src: NodeId, dst: NodeId) -> bool {
        self.find_edge(src, dst).is_some()
    }

    /// Number of (parallel) edges from `src` to `dst`
    pub fn edge_count_between(&self, src: NodeId, dst: NodeId) -> usize {
        self.edges_between(src, dst).count()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get an edge by ID
    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(&edge)
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    // Groups -----------------------------------------------------------------

    /// Create an empty group and insert it in the graph
    pub fn create_group(&mut self) -> GroupId {
        let group = self.make_group(DEFAULT_GROUP_CLASS);
        self.attach_group(group)
    }

    /// Create an empty group of a registered class and insert it in the graph
    pub fn create_group_of_class(&mut self, class_name: &str) -> Result<GroupId> {
        let group = self
            .group_classes
            .instantiate(class_name, || self.make_group(class_name))?;
        Ok(self.attach_group(group))
    }

    fn make_group(&self, class_name: &str) -> Group {
        if self.config.group_adjacency {
            Group::with_class(class_name)
        } else {
            Group::without_behaviours(class_name)
        }
    }

    /// Give the graph ownership of a group built outside of it
    pub fn insert_group(&mut self, group: Group) -> Result<GroupId> {
        let id = group.id();
        if self.groups.contains_key(&id) {
            return Err(TopologyError::DuplicateGroup(id));
        }
        Ok(self.attach_group(group))
    }

    fn attach_group(&mut self, mut group: Group) -> GroupId {
        group.set_member_kind(self.config.group_members);
        group.owner = Some(self.id);
        let id = group.id();
        self.groups.insert(id, group);
        self.notify(|b, g| b.group_inserted(g, id));
        id
    }

    /// Remove a group. Its members stay in the graph, ungrouped.
    pub fn remove_group(&mut self, group: GroupId) -> Result<()> {
        let target = self.groups.get(&group).ok_or(TopologyError::GroupNotFound(group))?;
        let members: Vec<NodeId> = target.nodes().iter().copied().collect();

        for node in &members {
            if let Some(member) = self.nodes.get_mut(node) {
                member.set_group(None);
            }
        }
        if let Some(mut removed) = self.groups.shift_remove(&group) {
            removed.owner = None;
        }
        self.properties.release_group(group);

        for node in members {
            self.notify(|b, g| b.node_ungrouped(g, group, node));
        }
        self.notify(|b, g| b.group_removed(g, group));
        Ok(())
    }

    /// Whether `group` belongs to this graph
    pub fn has_group(&self, group: GroupId) -> bool {
        self.groups.contains_key(&group)
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Get a group by ID
    pub fn group(&self, group: GroupId) -> Option<&Group> {
        self.groups.get(&group)
    }

    /// Mutable access to a group (behaviours only; membership goes through the graph)
    pub fn group_mut(&mut self, group: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&group)
    }

    /// All groups, in insertion order
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    /// Add `node` to `group`.
    ///
    /// Fails if the node already belongs to a group. Group behaviours then
    /// graph behaviours are notified.
    pub fn insert_node_in_group(&mut self, group: GroupId, node: NodeId) -> Result<()> {
        if !self.groups.contains_key(&group) {
            return Err(TopologyError::GroupNotFound(group));
        }
        let member = self.nodes.get_mut(&node).ok_or(TopologyError::NodeNotFound(node))?;
        if let Some(current) = member.group() {
            return Err(TopologyError::NodeAlreadyGrouped { node, group: current });
        }
        member.set_group(Some(group));
        if let Some(target) = self.groups.get_mut(&group) {
            target.members.insert(node);
        }

        self.notify_group(group, |b, ctx| b.node_inserted(ctx, node));
        self.notify(|b, g| b.node_grouped(g, group, node));
        Ok(())
    }

    /// Remove `node` from `group`; the node stays in the graph
    pub fn remove_node_from_group(&mut self, group: GroupId, node: NodeId) -> Result<()> {
        let target = self.groups.get(&group).ok_or(TopologyError::GroupNotFound(group))?;
        if !self.nodes.contains_key(&node) {
            return Err(TopologyError::NodeNotFound(node));
        }
        if !target.has_node(node) {
            return Err(TopologyError::NodeNotInGroup { node, group });
        }

        if let Some(target) = self.groups.get_mut(&group) {
            target.members.remove_all(&node);
        }
        if let Some(member) = self.nodes.get_mut(&node) {
            member.set_group(None);
        }

        self.notify_group(group, |b, ctx| b.node_removed(ctx, node));
        self.notify(|b, g| b.node_ungrouped(g, group, node));
        Ok(())
    }

    // Properties -------------------------------------------------------------

    /// Property accessor in use
    pub fn properties(&self) -> &dyn PropertyAccessor {
        self.properties.as_ref()
    }

    /// Node label and geometry
    pub fn node_properties(&self, node: NodeId) -> Option<ShapeProperties> {
        self.nodes.contains_key(&node).then(|| self.properties.node(node))
    }

    /// Node label
    pub fn node_label(&self, node: NodeId) -> Option<String> {
        self.node_properties(node).map(|p| p.label)
    }

    /// Replace node label and geometry
    pub fn set_node_properties(&mut self, node: NodeId, properties: ShapeProperties) -> Result<()> {
        self.update_node(node, |p| *p = properties)
    }

    /// Set the node label
    pub fn set_node_label(&mut self, node: NodeId, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        self.update_node(node, |p| p.label = label)
    }

    /// Set the node position
    pub fn set_node_position(&mut self, node: NodeId, x: f64, y: f64) -> Result<()> {
        self.update_node(node, |p| {
            p.x = x;
            p.y = y;
        })
    }

    /// Set the node size
    pub fn set_node_size(&mut self, node: NodeId, width: f64, height: f64) -> Result<()> {
        self.update_node(node, |p| {
            p.width = width;
            p.height = height;
        })
    }

    fn update_node(&mut self, node: NodeId, f: impl FnOnce(&mut ShapeProperties)) -> Result<()> {
        if !self.nodes.contains_key(&node) {
            return Err(TopologyError::NodeNotFound(node));
        }
        let mut properties = self.properties.node(node);
        f(&mut properties);
        self.properties.set_node(node, properties);
        self.notify(|b, g| b.node_modified(g, node));
        Ok(())
    }

    /// Edge weight
    pub fn edge_weight(&self, edge: EdgeId) -> Option<f64> {
        self.edges.contains_key(&edge).then(|| self.properties.edge_weight(edge))
    }

    /// Set the edge weight
    pub fn set_edge_weight(&mut self, edge: EdgeId, weight: f64) -> Result<()> {
        if !self.edges.contains_key(&edge) {
            return Err(TopologyError::EdgeNotFound(edge));
        }
        self.properties.set_edge_weight(edge, weight);
        self.notify(|b, g| b.edge_modified(g, edge));
        Ok(())
    }

    /// Group label and geometry
    pub fn group_properties(&self, group: GroupId) -> Option<ShapeProperties> {
        self.groups.contains_key(&group).then(|| self.properties.group(group))
    }

    /// Group label
    pub fn group_label(&self, group: GroupId) -> Option<String> {
        self.group_properties(group).map(|p| p.label)
    }

    /// Replace group label and geometry
    pub fn set_group_properties(&mut self, group: GroupId, properties: ShapeProperties) -> Result<()> {
        self.update_group(group, |p| *p = properties)
    }

    /// Set the group label
    pub fn set_group_label(&mut self, group: GroupId, label: impl Into<String>) -> Result<()> {
        let label = label.into();
        self.update_group(group, |p| p.label = label)
    }

    /// Set the group position
    pub fn set_group_position(&mut self, group: GroupId, x: f64, y: f64) -> Result<()> {
        self.update_group(group, |p| {
            p.x = x;
            p.y = y;
        })
    }

    /// Set the group size
    pub fn set_group_size(&mut self, group: GroupId, width: f64, height: f64) -> Result<()> {
        self.update_group(group, |p| {
            p.width = width;
            p.height = height;
        })
    }

    fn update_group(&mut self, group: GroupId, f: impl FnOnce(&mut ShapeProperties)) -> Result<()> {
        if !self.groups.contains_key(&group) {
            return Err(TopologyError::GroupNotFound(group));
        }
        let mut properties = self.properties.group(group);
        f(&mut properties);
        self.properties.set_group(group, properties);
        self.notify(|b, g| b.group_modified(g, group));
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.config.name)
            .field("nodes", &self.nodes.len())
            .field("root_nodes", &self.root_nodes.len())
            .field("edges", &self.edges.len())
            .field("groups", &self.groups.len())
            .field("behaviours", &self.behaviours)
            .finish()
    }
}

impl Drop for Graph {
    fn drop(&mut self) {
        // Primitives die with their graph; detach them so they don't report a leak
        for node in self.nodes.values_mut() {
            node.owner = None;
        }
        for edge in self.edges.values_mut() {
            edge.owner = None;
        }
        for group in self.groups.values_mut() {
            group.owner = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::LoggingBehaviour;
    use crate::container::ContainerKind;
    use crate::properties::StoredProperties;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        NodeInserted(NodeId),
        NodeRemoved(NodeId),
        NodeModified(NodeId),
        EdgeInserted(EdgeId),
        EdgeRemoved(EdgeId),
        InEdgeInserted(NodeId),
        OutEdgeInserted(NodeId),
        GroupInserted(GroupId),
        GroupRemoved(GroupId),
        Grouped(NodeId),
        Ungrouped(NodeId),
        Cleared,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<Event> {
            std::mem::take(&mut *self.events.borrow_mut())
        }

        fn push(&self, event: Event) {
            self.events.borrow_mut().push(event);
        }
    }

    impl GraphBehaviour for Recorder {
        fn node_inserted(&mut self, graph: &Graph, node: NodeId) {
            assert!(graph.contains_node(node));
            self.push(Event::NodeInserted(node));
        }

        fn node_removed(&mut self, graph: &Graph, node: NodeId) {
            assert!(!graph.contains_node(node));
            self.push(Event::NodeRemoved(node));
        }

        fn node_modified(&mut self, _graph: &Graph, node: NodeId) {
            self.push(Event::NodeModified(node));
        }

        fn in_edge_inserted(&mut self, _graph: &Graph, node: NodeId, _edge: EdgeId) {
            self.push(Event::InEdgeInserted(node));
        }

        fn out_edge_inserted(&mut self, _graph: &Graph, node: NodeId, _edge: EdgeId) {
            self.push(Event::OutEdgeInserted(node));
        }

        fn edge_inserted(&mut self, graph: &Graph, edge: EdgeId) {
            assert!(graph.edge(edge).is_some());
            self.push(Event::EdgeInserted(edge));
        }

        fn edge_removed(&mut self, graph: &Graph, edge: EdgeId, src: NodeId, _dst: NodeId) {
            assert!(graph.edge(edge).is_none());
            assert!(graph.node(src).map_or(true, |n| !n.out_edges().contains(&edge)));
            self.push(Event::EdgeRemoved(edge));
        }

        fn group_inserted(&mut self, _graph: &Graph, group: GroupId) {
            self.push(Event::GroupInserted(group));
        }

        fn group_removed(&mut self, _graph: &Graph, group: GroupId) {
            self.push(Event::GroupRemoved(group));
        }

        fn node_grouped(&mut self, _graph: &Graph, _group: GroupId, node: NodeId) {
            self.push(Event::Grouped(node));
        }

        fn node_ungrouped(&mut self, _graph: &Graph, _group: GroupId, node: NodeId) {
            self.push(Event::Ungrouped(node));
        }

        fn graph_cleared(&mut self, _graph: &Graph) {
            self.push(Event::Cleared);
        }
    }

    fn recorded_graph() -> (Graph, Recorder) {
        let recorder = Recorder::default();
        let mut graph = Graph::new();
        graph.add_behaviour("recorder", recorder.clone());
        (graph, recorder)
    }

    #[derive(Default)]
    struct ListSize(Rc<RefCell<Vec<usize>>>);

    impl GraphBehaviour for ListSize {
        fn node_inserted(&mut self, graph: &Graph, _node: NodeId) {
            self.0.borrow_mut().push(graph.behaviours().len());
        }
    }

    #[test]
    fn test_behaviour_list_detached_during_notification() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut graph = Graph::new();
        assert!(graph.add_behaviour("size", ListSize(seen.clone())));
        assert!(!graph.add_behaviour("size", ListSize::default()));

        graph.create_node();
        assert_eq!(*seen.borrow(), vec![0]);
        assert_eq!(graph.behaviours().len(), 1);
        assert_eq!(graph.behaviours().names().collect::<Vec<_>>(), vec!["size"]);
    }

    #[test]
    fn test_created_node_is_root() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node(a).unwrap().in_degree(), 0);
        assert!(graph.is_root_node(a).unwrap());
        assert_eq!(graph.root_node_count(), 1);
        assert!(graph.node(a).unwrap().is_attached());
    }

    #[test]
    fn test_create_edge_updates_degrees_and_roots() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let b = graph.create_node();

        let e = graph.create_edge(a, b).unwrap();
        assert_eq!(graph.node(a).unwrap().out_degree(), 1);
        assert_eq!(graph.node(b).unwrap().in_degree(), 1);
        assert!(graph.is_root_node(a).unwrap());
        assert!(!graph.is_root_node(b).unwrap());
        assert_eq!(graph.edge(e).unwrap().endpoints(), Some((a, b)));
        assert!(graph.node(a).unwrap().out_nodes().contains(&b));
        assert!(graph.node(b).unwrap().in_nodes().contains(&a));

        // A second incoming edge keeps b out of the cache
        let c = graph.create_node();
        graph.create_edge(c, b).unwrap();
        assert_eq!(graph.node(b).unwrap().in_degree(), 2);
        assert_eq!(graph.root_node_count(), 2);
    }

    #[test]
    fn test_create_edge_with_unknown_endpoint() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let stranger = NodeId::new();
        assert_eq!(
            graph.create_edge(a, stranger),
            Err(TopologyError::NodeNotFound(stranger))
        );
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.node(a).unwrap().out_degree(), 0);
    }

    #[test]
    fn test_end_to_end_chain() {
        init_tracing();
        let mut graph = Graph::new();
        graph.add_behaviour("log", LoggingBehaviour);
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph.create_edge(a, b).unwrap();
        let bc = graph.create_edge(b, c).unwrap();

        assert!(graph.is_root_node(a).unwrap());
        assert!(!graph.is_root_node(b).unwrap());
        assert!(!graph.is_root_node(c).unwrap());
        assert_eq!(graph.edge_count(), 2);

        graph.remove_edge_between(a, b).unwrap();
        assert!(graph.is_root_node(b).unwrap());

        graph.remove_node(b).unwrap();
        assert!(graph.edge(bc).is_none());
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_root_node(c).unwrap());
        assert!(!graph.contains_node(b));
    }

    #[test]
    fn test_remove_node_leaves_no_reference() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        let group = graph.create_group();
        graph.insert_node_in_group(group, b).unwrap();
        graph.create_edge(a, b).unwrap();
        graph.create_edge(b, c).unwrap();
        graph.create_edge(b, b).unwrap();

        graph.remove_node(b).unwrap();
        assert!(!graph.contains_node(b));
        assert!(graph.edges().all(|e| !e.touches(b)));
        assert!(graph.root_nodes().all(|n| n != b));
        assert!(!graph.group(group).unwrap().has_node(b));
        assert!(graph.group(group).unwrap().edges().is_empty());
        assert!(graph.group(group).unwrap().adjacent_edges().is_empty());
        assert_eq!(graph.node(a).unwrap().out_degree(), 0);
        assert_eq!(graph.node(c).unwrap().in_degree(), 0);
        assert!(graph.is_root_node(c).unwrap());
    }

    #[test]
    fn test_remove_unknown_node() {
        let mut graph = Graph::new();
        let stranger = NodeId::new();
        assert_eq!(graph.remove_node(stranger), Err(TopologyError::NodeNotFound(stranger)));
    }

    #[test]
    fn test_parallel_edges() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.create_edge(a, b).unwrap();
        graph.create_edge(a, b).unwrap();
        graph.create_edge(a, b).unwrap();
        assert_eq!(graph.edge_count_between(a, b), 3);
        assert_eq!(graph.edge_count_between(b, a), 0);
        assert!(graph.has_edge(a, b));
        assert!(!graph.has_edge(b, a));

        graph.remove_edge_between(a, b).unwrap();
        assert_eq!(graph.edge_count_between(a, b), 2);
        assert!(!graph.is_root_node(b).unwrap());

        assert_eq!(graph.remove_all_edges_between(a, b), Ok(2));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_root_node(b).unwrap());
        assert_eq!(
            graph.remove_edge_between(a, b),
            Err(TopologyError::NoEdgeBetween { src: a, dst: b })
        );
    }

    #[test]
    fn test_set_adjacency_backend() {
        let mut graph = Graph::with_config(GraphConfig {
            adjacency: ContainerKind::Set,
            ..GraphConfig::default()
        });
        let a = graph.create_node();
        let b = graph.create_node();
        graph.create_edge(a, b).unwrap();
        graph.create_edge(a, b).unwrap();
        assert_eq!(graph.node(a).unwrap().out_edges().kind(), ContainerKind::Set);
        assert_eq!(graph.edge_count_between(a, b), 2);
        graph.remove_edge_between(a, b).unwrap();
        assert!(graph.node(a).unwrap().out_nodes().contains(&b));
    }

    #[test]
    fn test_remove_edge_unknown() {
        let mut graph = Graph::new();
        let stranger = EdgeId::new();
        assert_eq!(graph.remove_edge(stranger), Err(TopologyError::EdgeNotFound(stranger)));
    }

    #[test]
    fn test_insert_external_node_and_edge() {
        let mut graph = Graph::new();
        let a = graph.insert_node(Node::with_class("External")).unwrap();
        let b = graph.create_node();
        assert!(graph.is_root_node(a).unwrap());
        assert_eq!(graph.node(a).unwrap().class_name(), "External");

        let edge = Edge::new(a, b);
        let id = graph.insert_edge(edge).unwrap();
        assert!(graph.edge(id).unwrap().is_attached());
        assert!(!graph.is_root_node(b).unwrap());

        let mut dangling = Edge::default();
        dangling.set_src(a).unwrap();
        let dangling_id = dangling.id();
        assert_eq!(
            graph.insert_edge(dangling),
            Err(TopologyError::InvalidEdge(dangling_id))
        );
    }

    #[test]
    fn test_insert_node_with_group_fails() {
        let mut graph = Graph::new();
        let mut node = Node::new();
        let group = GroupId::new();
        node.set_group(Some(group));
        let id = node.id();
        assert_eq!(
            graph.insert_node(node),
            Err(TopologyError::NodeAlreadyGrouped { node: id, group })
        );
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_install_root_node() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.create_edge(a, b).unwrap();

        assert_eq!(
            graph.install_root_node(b),
            Err(TopologyError::NotARootNode { node: b, in_degree: 1 })
        );
        graph.install_root_node(a).unwrap();
        assert_eq!(graph.root_node_count(), 1);
    }

    #[test]
    fn test_root_cache_drift_is_reported_and_repaired() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        graph.root_nodes.shift_remove(&a);
        assert_eq!(
            graph.is_root_node(a),
            Err(TopologyError::RootCacheMismatch { node: a, cached: false, in_degree: 0 })
        );
        assert_eq!(graph.rebuild_root_cache(), 1);
        assert!(graph.is_root_node(a).unwrap());
        assert_eq!(graph.rebuild_root_cache(), 0);
    }

    #[test]
    fn test_node_classes() {
        let mut graph = Graph::new();
        assert_eq!(
            graph.create_node_of_class("Control"),
            Err(TopologyError::UnknownClass("Control".into()))
        );
        graph.register_node_class("Control", |n| n.set_serializable(false));
        let control = graph.create_node_of_class("Control").unwrap();
        assert!(!graph.node(control).unwrap().is_serializable());
        assert_eq!(graph.node(control).unwrap().class_name(), "Control");

        let plain = graph.create_node_of_class(DEFAULT_NODE_CLASS).unwrap();
        assert!(graph.node(plain).unwrap().is_serializable());
    }

    #[test]
    fn test_edge_and_group_classes() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.register_edge_class("Dependency", |_| {});
        let e = graph.create_edge_of_class("Dependency", a, b).unwrap();
        assert_eq!(graph.edge(e).unwrap().class_name(), "Dependency");
        assert!(graph.create_edge_of_class("Unknown", a, b).is_err());
        assert_eq!(graph.edge_count(), 1);

        graph.register_group_class("Frame", |_| {});
        let g = graph.create_group_of_class("Frame").unwrap();
        assert_eq!(graph.group(g).unwrap().class_name(), "Frame");
    }

    #[test]
    fn test_group_scenario() {
        let mut graph = Graph::new();
        let group = graph.create_group();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.insert_node_in_group(group, a).unwrap();
        graph.insert_node_in_group(group, b).unwrap();
        let ab = graph.create_edge(a, b).unwrap();
        assert!(graph.group(group).unwrap().edges().contains(&ab));
        assert!(!graph.group(group).unwrap().adjacent_edges().contains(&ab));

        let c = graph.create_node();
        let bc = graph.create_edge(b, c).unwrap();
        let grp = graph.group(group).unwrap();
        assert!(grp.adjacent_edges().contains(&bc));
        assert!(!grp.edges().contains(&bc));
        assert_eq!(graph.node(a).unwrap().group(), Some(group));
    }

    #[test]
    fn test_group_adjacency_follows_membership() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        let ab = graph.create_edge(a, b).unwrap();
        let bc = graph.create_edge(b, c).unwrap();
        let group = graph.create_group();

        graph.insert_node_in_group(group, b).unwrap();
        let grp = graph.group(group).unwrap();
        assert!(grp.edges().is_empty());
        assert_eq!(grp.adjacent_edges().len(), 2);

        graph.insert_node_in_group(group, a).unwrap();
        let grp = graph.group(group).unwrap();
        assert!(grp.edges().contains(&ab));
        assert!(!grp.adjacent_edges().contains(&ab));
        assert!(grp.adjacent_edges().contains(&bc));

        graph.remove_node_from_group(group, a).unwrap();
        let grp = graph.group(group).unwrap();
        assert!(grp.adjacent_edges().contains(&ab));
        assert!(grp.edges().is_empty());

        graph.remove_node_from_group(group, b).unwrap();
        let grp = graph.group(group).unwrap();
        assert!(grp.adjacent_edges().is_empty());
        assert!(grp.edges().is_empty());

        graph.insert_node_in_group(group, b).unwrap();
        graph.remove_edge(bc).unwrap();
        assert_eq!(graph.group(group).unwrap().adjacent_edges().len(), 1);
    }

    #[test]
    fn test_group_membership_errors() {
        let mut graph = Graph::new();
        let g1 = graph.create_group();
        let g2 = graph.create_group();
        let a = graph.create_node();
        graph.insert_node_in_group(g1, a).unwrap();

        assert_eq!(
            graph.insert_node_in_group(g2, a),
            Err(TopologyError::NodeAlreadyGrouped { node: a, group: g1 })
        );
        assert_eq!(
            graph.insert_node_in_group(g1, a),
            Err(TopologyError::NodeAlreadyGrouped { node: a, group: g1 })
        );
        assert_eq!(
            graph.remove_node_from_group(g2, a),
            Err(TopologyError::NodeNotInGroup { node: a, group: g2 })
        );
        let stranger = GroupId::new();
        assert_eq!(
            graph.insert_node_in_group(stranger, a),
            Err(TopologyError::GroupNotFound(stranger))
        );
        assert_eq!(graph.group(g2).unwrap().node_count(), 0);
    }

    #[test]
    fn test_remove_group_ungroups_members() {
        let (mut graph, recorder) = recorded_graph();
        let group = graph.create_group();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.insert_node_in_group(group, a).unwrap();
        graph.insert_node_in_group(group, b).unwrap();
        recorder.take();

        graph.remove_group(group).unwrap();
        assert!(!graph.has_group(group));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node(a).unwrap().group(), None);
        assert_eq!(graph.node(b).unwrap().group(), None);
        assert_eq!(
            recorder.take(),
            vec![Event::Ungrouped(a), Event::Ungrouped(b), Event::GroupRemoved(group)]
        );
        assert_eq!(graph.remove_group(group), Err(TopologyError::GroupNotFound(group)));

        // Ungrouped nodes can join another group
        let other = graph.create_group();
        graph.insert_node_in_group(other, a).unwrap();
    }

    #[test]
    fn test_group_without_adjacency_behaviour() {
        let mut graph = Graph::with_config(GraphConfig {
            group_adjacency: false,
            ..GraphConfig::default()
        });
        let group = graph.create_group();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.insert_node_in_group(group, a).unwrap();
        graph.insert_node_in_group(group, b).unwrap();
        graph.create_edge(a, b).unwrap();
        assert!(graph.group(group).unwrap().edges().is_empty());
    }

    #[test]
    fn test_disabled_group_behaviour() {
        let mut graph = Graph::new();
        let group = graph.create_group();
        graph
            .group_mut(group)
            .unwrap()
            .behaviours_mut()
            .set_enabled(crate::behaviour::GroupAdjacentEdgesBehaviour::NAME, false);
        let a = graph.create_node();
        graph.insert_node_in_group(group, a).unwrap();
        graph.create_edge(a, a).unwrap();
        assert!(graph.group(group).unwrap().edges().is_empty());
    }

    #[test]
    fn test_behaviour_notifications() {
        let (mut graph, recorder) = recorded_graph();
        let a = graph.create_node();
        let b = graph.create_node();
        let e = graph.create_edge(a, b).unwrap();
        assert_eq!(
            recorder.take(),
            vec![
                Event::NodeInserted(a),
                Event::NodeInserted(b),
                Event::OutEdgeInserted(a),
                Event::InEdgeInserted(b),
                Event::EdgeInserted(e),
            ]
        );

        graph.set_node_label(a, "A").unwrap();
        assert_eq!(recorder.take(), vec![Event::NodeModified(a)]);

        graph.remove_node(a).unwrap();
        assert_eq!(recorder.take(), vec![Event::EdgeRemoved(e), Event::NodeRemoved(a)]);

        let group = graph.create_group();
        graph.insert_node_in_group(group, b).unwrap();
        assert_eq!(recorder.take(), vec![Event::GroupInserted(group), Event::Grouped(b)]);
    }

    #[test]
    fn test_disabled_graph_behaviour_is_skipped() {
        let (mut graph, recorder) = recorded_graph();
        graph.behaviours_mut().set_enabled("recorder", false);
        let a = graph.create_node();
        graph.remove_node(a).unwrap();
        assert!(recorder.take().is_empty());
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (mut graph, recorder) = recorded_graph();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.create_edge(a, b).unwrap();
        let group = graph.create_group();
        graph.insert_node_in_group(group, a).unwrap();

        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.group_count(), 0);
        assert_eq!(graph.root_node_count(), 0);
        assert_eq!(recorder.take().last(), Some(&Event::Cleared));

        graph.clear();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.group_count(), 0);
        assert_eq!(recorder.take(), vec![Event::Cleared]);
        assert_eq!(graph.behaviours().len(), 1);
    }

    #[test]
    fn test_properties_routing() {
        let mut graph = Graph::new().with_properties(StoredProperties::new());
        let a = graph.create_node();
        let b = graph.create_node();
        let e = graph.create_edge(a, b).unwrap();
        graph.set_node_label(a, "A").unwrap();
        graph.set_node_position(a, 10.0, 20.0).unwrap();
        graph.set_node_size(a, 100.0, 50.0).unwrap();
        graph.set_edge_weight(e, 0.75).unwrap();

        let props = graph.node_properties(a).unwrap();
        assert_eq!(props.label, "A");
        assert_eq!((props.x, props.y, props.width, props.height), (10.0, 20.0, 100.0, 50.0));
        assert_eq!(graph.edge_weight(e), Some(0.75));

        let group = graph.create_group();
        graph.set_group_label(group, "G").unwrap();
        graph.set_group_position(group, -5.0, 5.0).unwrap();
        graph.set_group_size(group, 300.0, 200.0).unwrap();
        let props = graph.group_properties(group).unwrap();
        assert_eq!(props.label, "G");
        assert_eq!((props.x, props.y, props.width, props.height), (-5.0, 5.0, 300.0, 200.0));
        graph.remove_group(group).unwrap();
        assert_eq!(graph.group_label(group), None);

        graph.remove_node(a).unwrap();
        assert_eq!(graph.node_label(a), None);
        assert_eq!(graph.edge_weight(e), None);
        assert_eq!(
            graph.set_node_label(a, "gone"),
            Err(TopologyError::NodeNotFound(a))
        );
    }

    #[test]
    fn test_null_properties_by_default() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        graph.set_node_label(a, "A").unwrap();
        assert_eq!(graph.node_label(a), Some(String::new()));
    }

    #[test]
    fn test_serializable_flag() {
        let mut graph = Graph::new();
        let a = graph.create_node();
        graph.set_node_serializable(a, false).unwrap();
        assert!(!graph.node(a).unwrap().is_serializable());
        assert!(graph.set_node_serializable(NodeId::new(), false).is_err());
    }
}
