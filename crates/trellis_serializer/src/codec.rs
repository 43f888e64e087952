// SPDX-License-Identifier: MIT OR Apache-2.0
//! Record codecs.
//!
//! An encoder turns one primitive into an [`AnyRecord`], a decoder rebuilds
//! a primitive in a graph from a record. The default codecs below handle
//! [`NodeRecord`], [`EdgeRecord`] and [`GroupRecord`]; primitive classes
//! carrying more state register their own codecs on the
//! [`Serializer`](crate::Serializer).

use crate::error::{Result, SerializeError};
use crate::format::{AnyRecord, EdgeRecord, GroupRecord, NodeRecord};
use crate::id_map::{IdObjectMap, ObjectIdMap, ObjectKey};
use indexmap::IndexSet;
use trellis_graph::{Edge, EdgeId, Graph, Group, GroupId, Node, NodeId, ShapeProperties};

/// Encodes a node of one class
pub type NodeEncoder = Box<dyn Fn(&Node, &EncodeContext<'_>) -> Result<AnyRecord>>;
/// Encodes an edge of one class
pub type EdgeEncoder = Box<dyn Fn(&Edge, &EncodeContext<'_>) -> Result<AnyRecord>>;
/// Encodes a group of one class
pub type GroupEncoder = Box<dyn Fn(&Group, &EncodeContext<'_>) -> Result<AnyRecord>>;

/// Rebuilds a node from a record of one type
pub type NodeDecoder = Box<dyn Fn(&AnyRecord, &mut Graph, &mut IdObjectMap) -> Result<NodeId>>;
/// Rebuilds an edge from a record of one type
pub type EdgeDecoder = Box<dyn Fn(&AnyRecord, &mut Graph, &mut IdObjectMap) -> Result<EdgeId>>;
/// Rebuilds a group from a record of one type
pub type GroupDecoder = Box<dyn Fn(&AnyRecord, &mut Graph, &mut IdObjectMap) -> Result<GroupId>>;

/// Graph being encoded and its id map
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    /// Source graph
    pub graph: &'a Graph,
    /// Stream ids of the graph primitives
    pub ids: &'a ObjectIdMap,
    /// Nodes already written to the stream (empty while nodes are encoded)
    pub written: &'a IndexSet<NodeId>,
}

impl EncodeContext<'_> {
    /// Whether `node` has been written to the stream
    pub fn is_written(&self, node: NodeId) -> bool {
        self.written.contains(&node)
    }

    /// Stream id of a written node
    pub fn node_id(&self, node: NodeId) -> Option<i32> {
        if self.is_written(node) {
            self.ids.node(node)
        } else {
            None
        }
    }
}

fn shape_of(label: &str, x: f64, y: f64, width: f64, height: f64) -> ShapeProperties {
    ShapeProperties {
        label: label.to_string(),
        x,
        y,
        width,
        height,
    }
}

/// Encode a node label, geometry and stream id
pub fn encode_node(node: &Node, ctx: &EncodeContext<'_>) -> Result<AnyRecord> {
    let shape = ctx.graph.node_properties(node.id()).unwrap_or_default();
    AnyRecord::pack(&NodeRecord {
        label: shape.label,
        x: shape.x,
        y: shape.y,
        width: shape.width,
        height: shape.height,
        node_id: ctx.ids.node(node.id()).unwrap_or(-1),
    })
}

/// Encode an edge endpoints and weight.
///
/// Both endpoints must have been written.
pub fn encode_edge(edge: &Edge, ctx: &EncodeContext<'_>) -> Result<AnyRecord> {
    let endpoints = edge
        .endpoints()
        .map(|(src, dst)| (ctx.node_id(src), ctx.node_id(dst)));
    let Some((Some(src_node_id), Some(dst_node_id))) = endpoints else {
        return Err(SerializeError::MissingEndpoint(edge.id()));
    };
    AnyRecord::pack(&EdgeRecord {
        edge_id: ctx.ids.edge(edge.id()).unwrap_or(-1),
        src_node_id,
        dst_node_id,
        weight: ctx.graph.edge_weight(edge.id()).unwrap_or_default(),
    })
}

/// Encode a group label, geometry and written members
pub fn encode_group(group: &Group, ctx: &EncodeContext<'_>) -> Result<AnyRecord> {
    let shape = ctx.graph.group_properties(group.id()).unwrap_or_default();
    let node_ids = group.nodes().iter().filter_map(|n| ctx.node_id(*n)).collect();
    AnyRecord::pack(&GroupRecord {
        label: shape.label,
        x: shape.x,
        y: shape.y,
        width: shape.width,
        height: shape.height,
        group_id: ctx.ids.group(group.id()).unwrap_or(-1),
        node_ids,
    })
}

/// Create a node of `class_name` from a [`NodeRecord`]
pub fn decode_node(
    record: &AnyRecord,
    graph: &mut Graph,
    ids: &mut IdObjectMap,
    class_name: &str,
) -> Result<NodeId> {
    let data: NodeRecord = record.unpack()?;
    let node = graph.create_node_of_class(class_name)?;
    ids.insert(data.node_id, ObjectKey::Node(node));
    graph.set_node_properties(
        node,
        shape_of(&data.label, data.x, data.y, data.width, data.height),
    )?;
    Ok(node)
}

/// Create an edge of `class_name` from an [`EdgeRecord`].
///
/// Fails without touching the graph if an endpoint id is unresolved.
pub fn decode_edge(
    record: &AnyRecord,
    graph: &mut Graph,
    ids: &mut IdObjectMap,
    class_name: &str,
) -> Result<EdgeId> {
    let data: EdgeRecord = record.unpack()?;
    let src = ids
        .node(data.src_node_id)
        .ok_or(SerializeError::UnresolvedId(data.src_node_id))?;
    let dst = ids
        .node(data.dst_node_id)
        .ok_or(SerializeError::UnresolvedId(data.dst_node_id))?;
    let edge = graph.create_edge_of_class(class_name, src, dst)?;
    ids.insert(data.edge_id, ObjectKey::Edge(edge));
    graph.set_edge_weight(edge, data.weight)?;
    Ok(edge)
}

/// Create a group of `class_name` from a [`GroupRecord`].
///
/// Unresolved member ids are skipped.
pub fn decode_group(
    record: &AnyRecord,
    graph: &mut Graph,
    ids: &mut IdObjectMap,
    class_name: &str,
) -> Result<GroupId> {
    let data: GroupRecord = record.unpack()?;
    let group = graph.create_group_of_class(class_name)?;
    ids.insert(data.group_id, ObjectKey::Group(group));
    graph.set_group_properties(
        group,
        shape_of(&data.label, data.x, data.y, data.width, data.height),
    )?;

    for member_id in data.node_ids {
        let Some(node) = ids.node(member_id) else {
            tracing::warn!("Group {group} references unknown node id {member_id}, member skipped");
            continue;
        };
        if let Err(e) = graph.insert_node_in_group(group, node) {
            tracing::warn!("Group {group} member {member_id} skipped: {e}");
        }
    }
    Ok(group)
}
