// SPDX-License-Identifier: MIT OR Apache-2.0
//! Directed edge primitive.

use crate::error::{Result, TopologyError};
use crate::graph::GraphId;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Class name of plain edges
pub const DEFAULT_EDGE_CLASS: &str = "trellis::Edge";

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    /// Create a new random edge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge:{}", self.0.simple())
    }
}

/// A directed edge between two nodes.
///
/// The edge does not own its endpoints. Both must be set before the edge
/// is inserted in a graph and can't change afterwards.
#[derive(Debug)]
pub struct Edge {
    id: EdgeId,
    class_name: String,
    src: Option<NodeId>,
    dst: Option<NodeId>,
    pub(crate) owner: Option<GraphId>,
}

impl Edge {
    /// Create a detached edge of the default class
    pub fn new(src: NodeId, dst: NodeId) -> Self {
        Self::with_class(DEFAULT_EDGE_CLASS, src, dst)
    }

    /// Create a detached edge tagged with `class_name`
    pub fn with_class(class_name: impl Into<String>, src: NodeId, dst: NodeId) -> Self {
        Self {
            id: EdgeId::new(),
            class_name: class_name.into(),
            src: Some(src),
            dst: Some(dst),
            owner: None,
        }
    }

    /// Edge identifier
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Class name used for polymorphic (de)serialization
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Source node
    pub fn src(&self) -> Option<NodeId> {
        self.src
    }

    /// Destination node
    pub fn dst(&self) -> Option<NodeId> {
        self.dst
    }

    /// Both endpoints, if set
    pub fn endpoints(&self) -> Option<(NodeId, NodeId)> {
        Some((self.src?, self.dst?))
    }

    /// Whether `node` is one of the endpoints
    pub fn touches(&self, node: NodeId) -> bool {
        self.src == Some(node) || self.dst == Some(node)
    }

    /// Whether this edge is currently owned by a graph
    pub fn is_attached(&self) -> bool {
        self.owner.is_some()
    }

    /// Change the source node
    pub fn set_src(&mut self, src: NodeId) -> Result<()> {
        if self.owner.is_some() {
            return Err(TopologyError::EdgeAttached(self.id));
        }
        self.src = Some(src);
        Ok(())
    }

    /// Change the destination node
    pub fn set_dst(&mut self, dst: NodeId) -> Result<()> {
        if self.owner.is_some() {
            return Err(TopologyError::EdgeAttached(self.id));
        }
        self.dst = Some(dst);
        Ok(())
    }
}

impl Default for Edge {
    /// An edge with no endpoints yet
    fn default() -> Self {
        Self {
            id: EdgeId::new(),
            class_name: DEFAULT_EDGE_CLASS.to_string(),
            src: None,
            dst: None,
            owner: None,
        }
    }
}

impl Drop for Edge {
    fn drop(&mut self) {
        if self.owner.is_some() {
            tracing::warn!(
                "Edge {} has been deleted before being removed from its graph",
                self.id
            );
        }
    }
}
