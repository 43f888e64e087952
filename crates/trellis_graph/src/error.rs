// SPDX-License-Identifier: MIT OR Apache-2.0
//! Topology errors raised by structural mutations.

use crate::edge::EdgeId;
use crate::group::GroupId;
use crate::node::NodeId;

/// Result type for topology operations
pub type Result<T> = std::result::Result<T, TopologyError>;

/// A requested structural mutation would break a graph invariant.
///
/// Operations returning this error leave the graph untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    /// Node is not registered in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Edge is not registered in the graph
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// Group is not registered in the graph
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// Node is already registered in the graph
    #[error("Node already inserted: {0}")]
    DuplicateNode(NodeId),

    /// Edge is already registered in the graph
    #[error("Edge already inserted: {0}")]
    DuplicateEdge(EdgeId),

    /// Group is already registered in the graph
    #[error("Group already inserted: {0}")]
    DuplicateGroup(GroupId),

    /// Edge is missing a source or destination
    #[error("Edge {0} has no valid source or destination")]
    InvalidEdge(EdgeId),

    /// Edge endpoints can't change once the edge is in a graph
    #[error("Edge {0} is attached to a graph")]
    EdgeAttached(EdgeId),

    /// Edge is not registered in a node adjacency list
    #[error("Edge {edge} is not registered on node {node}")]
    EdgeNotRegistered {
        /// Node whose adjacency was searched
        node: NodeId,
        /// Missing edge
        edge: EdgeId,
    },

    /// Node already belongs to a group
    #[error("Node {node} already belongs to group {group}")]
    NodeAlreadyGrouped {
        /// Grouped node
        node: NodeId,
        /// Current owning group
        group: GroupId,
    },

    /// Node is not a member of the group
    #[error("Node {node} is not a member of group {group}")]
    NodeNotInGroup {
        /// Node
        node: NodeId,
        /// Group
        group: GroupId,
    },

    /// An externally built node can't carry adjacency into a graph
    #[error("Node {0} already has incident edges")]
    NodeHasEdges(NodeId),

    /// No edge between the two nodes
    #[error("No edge from {src} to {dst}")]
    NoEdgeBetween {
        /// Source node
        src: NodeId,
        /// Destination node
        dst: NodeId,
    },

    /// Root node installation requires a zero in degree
    #[error("Node {node} has in degree {in_degree} and can't be a root node")]
    NotARootNode {
        /// Node
        node: NodeId,
        /// Actual in degree
        in_degree: usize,
    },

    /// Root node cache and node in degree disagree
    #[error("Root node cache is inconsistent for node {node} (cached: {cached}, in degree: {in_degree})")]
    RootCacheMismatch {
        /// Node
        node: NodeId,
        /// Whether the node is in the root cache
        cached: bool,
        /// Actual in degree
        in_degree: usize,
    },

    /// No class registered under that name
    #[error("Unknown primitive class: {0}")]
    UnknownClass(String),
}
