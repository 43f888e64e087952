// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node groups (sub-graph clusters).

use crate::behaviour::{Behaviours, GroupAdjacentEdgesBehaviour, GroupBehaviour};
use crate::container::{ContainerKind, Entries};
use crate::edge::EdgeId;
use crate::graph::GraphId;
use crate::node::NodeId;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Class name of plain groups
pub const DEFAULT_GROUP_CLASS: &str = "trellis::Group";

/// Unique identifier for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub Uuid);

impl GroupId {
    /// Create a new random group ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{}", self.0.simple())
    }
}

/// Edges of a group, split by how many endpoints are members
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAdjacency {
    /// Edges with both endpoints in the group
    pub edges: IndexSet<EdgeId>,
    /// Edges with exactly one endpoint in the group
    pub adjacent_edges: IndexSet<EdgeId>,
}

impl GroupAdjacency {
    /// Drop `edge` from both sets
    pub fn forget(&mut self, edge: EdgeId) {
        self.edges.shift_remove(&edge);
        self.adjacent_edges.shift_remove(&edge);
    }

    /// Empty both sets
    pub fn clear(&mut self) {
        self.edges.clear();
        self.adjacent_edges.clear();
    }
}

/// A group of nodes.
///
/// Membership is managed through [`Graph::insert_node_in_group`](crate::Graph::insert_node_in_group)
/// and [`Graph::remove_node_from_group`](crate::Graph::remove_node_from_group) so the
/// node back-reference and the adjacency sets stay consistent.
#[derive(Debug)]
pub struct Group {
    id: GroupId,
    class_name: String,
    pub(crate) members: Entries<NodeId>,
    pub(crate) adjacency: GroupAdjacency,
    pub(crate) behaviours: Behaviours<dyn GroupBehaviour>,
    pub(crate) owner: Option<GraphId>,
}

impl Group {
    /// Create a detached group of the default class, maintaining its adjacent edges
    pub fn new() -> Self {
        Self::with_class(DEFAULT_GROUP_CLASS)
    }

    /// Create a detached group tagged with `class_name`, maintaining its adjacent edges
    pub fn with_class(class_name: impl Into<String>) -> Self {
        let mut group = Self::without_behaviours(class_name);
        group.behaviours.add(
            GroupAdjacentEdgesBehaviour::NAME,
            Box::new(GroupAdjacentEdgesBehaviour),
        );
        group
    }

    /// Create a detached group with no behaviour installed
    pub fn without_behaviours(class_name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            class_name: class_name.into(),
            members: Entries::default(),
            adjacency: GroupAdjacency::default(),
            behaviours: Behaviours::new(),
            owner: None,
        }
    }

    /// Group identifier
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Class name used for polymorphic (de)serialization
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether this group is currently owned by a graph
    pub fn is_attached(&self) -> bool {
        self.owner.is_some()
    }

    /// Member nodes
    pub fn nodes(&self) -> &Entries<NodeId> {
        &self.members
    }

    /// Whether `node` is a member
    pub fn has_node(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Number of members
    pub fn node_count(&self) -> usize {
        self.members.len()
    }

    /// Edges with both endpoints in this group
    pub fn edges(&self) -> &IndexSet<EdgeId> {
        &self.adjacency.edges
    }

    /// Edges crossing the group boundary
    pub fn adjacent_edges(&self) -> &IndexSet<EdgeId> {
        &self.adjacency.adjacent_edges
    }

    /// Behaviours attached to this group
    pub fn behaviours(&self) -> &Behaviours<dyn GroupBehaviour> {
        &self.behaviours
    }

    /// Mutable access to the behaviours attached to this group
    pub fn behaviours_mut(&mut self) -> &mut Behaviours<dyn GroupBehaviour> {
        &mut self.behaviours
    }

    pub(crate) fn set_member_kind(&mut self, kind: ContainerKind) {
        debug_assert!(self.members.is_empty());
        self.members = kind.entries();
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        if self.owner.is_some() {
            tracing::warn!(
                "Group {} has been destroyed before being removed from its graph",
                self.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_has_adjacency_behaviour() {
        let group = Group::new();
        assert_eq!(group.class_name(), DEFAULT_GROUP_CLASS);
        assert_eq!(
            group.behaviours().is_enabled(GroupAdjacentEdgesBehaviour::NAME),
            Some(true)
        );
        assert_eq!(group.node_count(), 0);
        assert!(group.edges().is_empty());
        assert!(group.adjacent_edges().is_empty());
    }

    #[test]
    fn test_bare_group() {
        let group = Group::without_behaviours("custom");
        assert!(group.behaviours().is_empty());
        assert!(!group.is_attached());
    }

    #[test]
    fn test_adjacency_forget() {
        let mut adjacency = GroupAdjacency::default();
        let (a, b) = (EdgeId::new(), EdgeId::new());
        adjacency.edges.insert(a);
        adjacency.adjacent_edges.insert(b);
        adjacency.forget(a);
        adjacency.forget(b);
        assert_eq!(adjacency, GroupAdjacency::default());
    }
}
