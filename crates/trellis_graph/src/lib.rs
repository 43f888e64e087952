// SPDX-License-Identifier: MIT OR Apache-2.0
//! Directed graph topology engine.
//!
//! This crate models directed multigraphs made of:
//! - Nodes with in/out edge and neighbour lists
//! - Directed edges, parallel edges and self loops included
//! - Groups clustering nodes, with internal and adjacent edge sets
//!
//! ## Architecture
//!
//! A [`Graph`] owns every primitive and is the single entry point for
//! structural mutations, so node degrees, edge endpoints, group membership
//! and the root node cache always agree. Changes are reported to
//! [`GraphBehaviour`] and [`GroupBehaviour`] observers, and property
//! reads and writes go through a [`PropertyAccessor`].

pub mod behaviour;
pub mod class;
pub mod config;
pub mod container;
pub mod edge;
pub mod error;
pub mod graph;
pub mod group;
pub mod node;
pub mod properties;

pub use behaviour::{
    Behaviours, GraphBehaviour, GroupAdjacentEdgesBehaviour, GroupBehaviour, GroupContext,
    LoggingBehaviour,
};
pub use class::{ClassInit, ClassRegistry};
pub use config::{ConfigError, GraphConfig};
pub use container::{ContainerKind, Entries};
pub use edge::{Edge, EdgeId, DEFAULT_EDGE_CLASS};
pub use error::{Result, TopologyError};
pub use graph::{Graph, GraphId};
pub use group::{Group, GroupAdjacency, GroupId, DEFAULT_GROUP_CLASS};
pub use node::{Node, NodeId, DEFAULT_NODE_CLASS};
pub use properties::{NullProperties, PropertyAccessor, ShapeProperties, StoredProperties};
