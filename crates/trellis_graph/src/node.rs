// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node primitive and its adjacency bookkeeping.

use crate::container::{ContainerKind, Entries};
use crate::edge::{Edge, EdgeId};
use crate::error::{Result, TopologyError};
use crate::graph::GraphId;
use crate::group::GroupId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Class name of plain nodes
pub const DEFAULT_NODE_CLASS: &str = "trellis::Node";

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0.simple())
    }
}

/// A node in a directed graph.
///
/// A node does not own its edges or its group: in/out edge lists, the
/// neighbour lists mirroring them and the group reference are plain ids
/// into the owning [`Graph`](crate::Graph). The neighbour lists hold one
/// entry per edge, so parallel edges show up as repeated neighbours.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    class_name: String,
    serializable: bool,
    in_edges: Entries<EdgeId>,
    out_edges: Entries<EdgeId>,
    in_nodes: Entries<NodeId>,
    out_nodes: Entries<NodeId>,
    group: Option<GroupId>,
    pub(crate) owner: Option<GraphId>,
}

impl Node {
    /// Create a detached node of the default class
    pub fn new() -> Self {
        Self::with_class(DEFAULT_NODE_CLASS)
    }

    /// Create a detached node tagged with `class_name`
    pub fn with_class(class_name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            class_name: class_name.into(),
            serializable: true,
            in_edges: Entries::default(),
            out_edges: Entries::default(),
            in_nodes: ContainerKind::List.entries(),
            out_nodes: ContainerKind::List.entries(),
            group: None,
            owner: None,
        }
    }

    /// Node identifier
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Class name used for polymorphic (de)serialization
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Whether this node takes part in serialization
    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    /// Change the serializable flag (control nodes are usually excluded)
    pub fn set_serializable(&mut self, serializable: bool) {
        self.serializable = serializable;
    }

    /// Whether this node is currently owned by a graph
    pub fn is_attached(&self) -> bool {
        self.owner.is_some()
    }

    /// Switch the edge containers backend; only valid while the node has no edges
    pub(crate) fn set_container_kind(&mut self, kind: ContainerKind) {
        debug_assert!(self.in_edges.is_empty() && self.out_edges.is_empty());
        self.in_edges = kind.entries();
        self.out_edges = kind.entries();
    }

    /// Register `edge` as an out edge of this node.
    ///
    /// If the edge source is not this node it is set to this node.
    pub fn add_out_edge(&mut self, edge: &mut Edge) -> Result<()> {
        let dst = edge.dst().ok_or(TopologyError::InvalidEdge(edge.id()))?;
        if edge.src() != Some(self.id) {
            edge.set_src(self.id)?;
        }
        self.out_edges.insert(edge.id());
        self.out_nodes.insert(dst);
        Ok(())
    }

    /// Register `edge` as an in edge of this node.
    ///
    /// If the edge destination is not this node it is set to this node.
    pub fn add_in_edge(&mut self, edge: &mut Edge) -> Result<()> {
        let src = edge.src().ok_or(TopologyError::InvalidEdge(edge.id()))?;
        if edge.dst() != Some(self.id) {
            edge.set_dst(self.id)?;
        }
        self.in_edges.insert(edge.id());
        self.in_nodes.insert(src);
        Ok(())
    }

    /// Remove `edge` from this node out edges
    pub fn remove_out_edge(&mut self, edge: &Edge) -> Result<()> {
        if !self.out_edges.remove(&edge.id()) {
            return Err(TopologyError::EdgeNotRegistered { node: self.id, edge: edge.id() });
        }
        if let Some(dst) = edge.dst() {
            self.out_nodes.remove(&dst);
        }
        Ok(())
    }

    /// Remove `edge` from this node in edges
    pub fn remove_in_edge(&mut self, edge: &Edge) -> Result<()> {
        if !self.in_edges.remove(&edge.id()) {
            return Err(TopologyError::EdgeNotRegistered { node: self.id, edge: edge.id() });
        }
        if let Some(src) = edge.src() {
            self.in_nodes.remove(&src);
        }
        Ok(())
    }

    /// In edges
    pub fn in_edges(&self) -> &Entries<EdgeId> {
        &self.in_edges
    }

    /// Out edges
    pub fn out_edges(&self) -> &Entries<EdgeId> {
        &self.out_edges
    }

    /// Source nodes of the in edges
    pub fn in_nodes(&self) -> &Entries<NodeId> {
        &self.in_nodes
    }

    /// Destination nodes of the out edges
    pub fn out_nodes(&self) -> &Entries<NodeId> {
        &self.out_nodes
    }

    /// Number of in edges
    pub fn in_degree(&self) -> usize {
        self.in_edges.len()
    }

    /// Number of out edges
    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }

    /// All incident edges, in edges first
    pub fn incident_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.in_edges.iter().chain(self.out_edges.iter()).copied()
    }

    /// Owning group, if any
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// Set the owning group (not validated here, see [`Graph::insert_node_in_group`](crate::Graph::insert_node_in_group))
    pub fn set_group(&mut self, group: Option<GroupId>) {
        self.group = group;
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        if self.owner.is_some() {
            tracing::warn!(
                "Node {} has been destroyed before being removed from its graph",
                self.id
            );
        }
    }
}
