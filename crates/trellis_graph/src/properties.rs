// SPDX-License-Identifier: MIT OR Apache-2.0
//! Primitive property accessors.
//!
//! The engine does not store labels, geometry or weights itself. Reads and
//! writes are routed to a [`PropertyAccessor`] supplied by whoever owns the
//! actual values (usually a presentation layer). [`NullProperties`] ignores
//! writes, [`StoredProperties`] keeps everything in memory.

use crate::edge::EdgeId;
use crate::group::GroupId;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label and geometry of a node or a group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeProperties {
    /// Display label
    pub label: String,
    /// Horizontal position
    pub x: f64,
    /// Vertical position
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Property storage policy.
///
/// Every method defaults to a no-op getter returning an empty value.
#[allow(unused_variables)]
pub trait PropertyAccessor {
    /// Node label, x, y, width and height
    fn node(&self, node: NodeId) -> ShapeProperties {
        ShapeProperties::default()
    }

    /// Replace the node properties
    fn set_node(&mut self, node: NodeId, properties: ShapeProperties) {}

    /// Edge weight
    fn edge_weight(&self, edge: EdgeId) -> f64 {
        0.0
    }

    /// Set the edge weight
    fn set_edge_weight(&mut self, edge: EdgeId, weight: f64) {}

    /// Group label, x, y, width and height
    fn group(&self, group: GroupId) -> ShapeProperties {
        ShapeProperties::default()
    }

    /// Replace the group properties
    fn set_group(&mut self, group: GroupId, properties: ShapeProperties) {}

    /// A node has left the graph
    fn release_node(&mut self, node: NodeId) {}

    /// An edge has left the graph
    fn release_edge(&mut self, edge: EdgeId) {}

    /// A group has left the graph
    fn release_group(&mut self, group: GroupId) {}
}

/// Accessor discarding every write
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProperties;

impl PropertyAccessor for NullProperties {}

/// Accessor keeping properties in hash maps
#[derive(Debug, Default, Clone)]
pub struct StoredProperties {
    nodes: HashMap<NodeId, ShapeProperties>,
    edges: HashMap<EdgeId, f64>,
    groups: HashMap<GroupId, ShapeProperties>,
}

impl StoredProperties {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of primitives with stored values
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len() + self.groups.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PropertyAccessor for StoredProperties {
    fn node(&self, node: NodeId) -> ShapeProperties {
        self.nodes.get(&node).cloned().unwrap_or_default()
    }

    fn set_node(&mut self, node: NodeId, properties: ShapeProperties) {
        self.nodes.insert(node, properties);
    }

    fn edge_weight(&self, edge: EdgeId) -> f64 {
        self.edges.get(&edge).copied().unwrap_or_default()
    }

    fn set_edge_weight(&mut self, edge: EdgeId, weight: f64) {
        self.edges.insert(edge, weight);
    }

    fn group(&self, group: GroupId) -> ShapeProperties {
        self.groups.get(&group).cloned().unwrap_or_default()
    }

    fn set_group(&mut self, group: GroupId, properties: ShapeProperties) {
        self.groups.insert(group, properties);
    }

    fn release_node(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }

    fn release_edge(&mut self, edge: EdgeId) {
        self.edges.remove(&edge);
    }

    fn release_group(&mut self, group: GroupId) {
        self.groups.remove(&group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_properties_ignore_writes() {
        let mut props = NullProperties;
        let node = NodeId::new();
        props.set_node(
            node,
            ShapeProperties {
                label: "ignored".into(),
                ..Default::default()
            },
        );
        assert_eq!(props.node(node), ShapeProperties::default());
        props.set_edge_weight(EdgeId::new(), 3.0);
        assert_eq!(props.edge_weight(EdgeId::new()), 0.0);
    }

    #[test]
    fn test_stored_properties() {
        let mut props = StoredProperties::new();
        let node = NodeId::new();
        let edge = EdgeId::new();
        let shape = ShapeProperties {
            label: "A".into(),
            x: 1.0,
            y: 2.0,
            width: 30.0,
            height: 40.0,
        };
        props.set_node(node, shape.clone());
        props.set_edge_weight(edge, 0.5);
        assert_eq!(props.node(node), shape);
        assert_eq!(props.edge_weight(edge), 0.5);
        assert_eq!(props.len(), 2);

        props.release_node(node);
        props.release_edge(edge);
        assert!(props.is_empty());
    }
}
