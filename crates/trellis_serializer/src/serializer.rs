// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph structural serializer.
//!
//! Encoding walks nodes, edges then groups and looks up an encoder by the
//! primitive class name. Decoding parses the whole message first, then
//! rebuilds nodes, edges and groups in that order, dispatching each record
//! to the decoder registered for its type url.
//!
//! Failures on a single primitive are logged and skipped; the returned
//! report tells how many primitives of each kind were expected and how
//! many made it through. Only stream level failures abort.

use crate::codec::{
    self, EdgeDecoder, EdgeEncoder, EncodeContext, GroupDecoder, GroupEncoder, NodeDecoder,
    NodeEncoder,
};
use crate::error::Result;
use crate::format::{AnyRecord, EdgeRecord, GraphMessage, GroupRecord, NodeRecord, Record};
use crate::id_map::{IdObjectMap, ObjectIdMap};
use crate::progress::ProgressNotifier;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use trellis_graph::{
    ConfigError, Edge, EdgeId, Graph, Group, GroupId, Node, NodeId, DEFAULT_EDGE_CLASS,
    DEFAULT_GROUP_CLASS, DEFAULT_NODE_CLASS,
};

/// Class names handled by the default codecs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Node class
    pub node: String,
    /// Edge class
    pub edge: String,
    /// Group class
    pub group: String,
}

impl ClassNames {
    /// Parse class names from RON; missing fields take their default value
    pub fn from_ron(source: &str) -> std::result::Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Write class names as pretty RON
    pub fn to_ron(&self) -> std::result::Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            node: DEFAULT_NODE_CLASS.to_string(),
            edge: DEFAULT_EDGE_CLASS.to_string(),
            group: DEFAULT_GROUP_CLASS.to_string(),
        }
    }
}

/// Expected and processed primitives of one kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrimitiveCount {
    /// Primitives that should have been processed
    pub expected: usize,
    /// Primitives actually processed
    pub processed: usize,
}

impl PrimitiveCount {
    /// Whether every expected primitive was processed
    pub fn is_complete(&self) -> bool {
        self.processed == self.expected
    }

    /// Number of primitives that were not processed
    pub fn missing(&self) -> usize {
        self.expected.saturating_sub(self.processed)
    }
}

impl fmt::Display for PrimitiveCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.processed, self.expected)
    }
}

/// Outcome of [`Serializer::serialize_out`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeReport {
    /// Serializable nodes
    pub nodes: PrimitiveCount,
    /// Edges between serializable nodes
    pub edges: PrimitiveCount,
    /// Groups
    pub groups: PrimitiveCount,
}

impl SerializeReport {
    /// Whether every eligible primitive was written
    pub fn is_complete(&self) -> bool {
        self.nodes.is_complete() && self.edges.is_complete() && self.groups.is_complete()
    }
}

/// Outcome of [`Serializer::serialize_in`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeserializeReport {
    /// Nodes announced by the stream header and nodes rebuilt
    pub nodes: PrimitiveCount,
    /// Edges announced by the stream header and edges rebuilt
    pub edges: PrimitiveCount,
    /// Groups announced by the stream header and groups rebuilt
    pub groups: PrimitiveCount,
    /// First caller defined extension record
    pub user1: Option<AnyRecord>,
    /// Second caller defined extension record
    pub user2: Option<AnyRecord>,
}

impl DeserializeReport {
    /// Whether every announced primitive was rebuilt
    pub fn is_complete(&self) -> bool {
        self.nodes.is_complete() && self.edges.is_complete() && self.groups.is_complete()
    }
}

/// Caller defined records stored next to the graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRecords {
    /// First extension slot
    pub user1: Option<AnyRecord>,
    /// Second extension slot
    pub user2: Option<AnyRecord>,
}

impl UserRecords {
    /// Pack one or two caller records
    pub fn pack<A: Record, B: Record>(user1: Option<&A>, user2: Option<&B>) -> Result<Self> {
        Ok(Self {
            user1: user1.map(AnyRecord::pack).transpose()?,
            user2: user2.map(AnyRecord::pack).transpose()?,
        })
    }
}

/// Registry of record codecs, able to write a graph to a stream and rebuild it.
///
/// A new serializer handles the default node, edge and group classes.
pub struct Serializer {
    class_names: ClassNames,
    node_encoders: IndexMap<String, NodeEncoder>,
    edge_encoders: IndexMap<String, EdgeEncoder>,
    group_encoders: IndexMap<String, GroupEncoder>,
    node_decoders: IndexMap<String, NodeDecoder>,
    edge_decoders: IndexMap<String, EdgeDecoder>,
    group_decoders: IndexMap<String, GroupDecoder>,
}

impl Serializer {
    /// Create a serializer with codecs for the default classes
    pub fn new() -> Self {
        Self::with_class_names(ClassNames::default())
    }

    /// Create a serializer whose default codecs handle `class_names`
    pub fn with_class_names(class_names: ClassNames) -> Self {
        let mut serializer = Self {
            class_names: class_names.clone(),
            node_encoders: IndexMap::new(),
            edge_encoders: IndexMap::new(),
            group_encoders: IndexMap::new(),
            node_decoders: IndexMap::new(),
            edge_decoders: IndexMap::new(),
            group_decoders: IndexMap::new(),
        };

        let ClassNames { node, edge, group } = class_names;
        serializer.register_node_encoder(node.clone(), codec::encode_node);
        serializer.register_node_decoder(NodeRecord::TYPE_URL, move |r, g, ids| {
            codec::decode_node(r, g, ids, &node)
        });
        serializer.register_edge_encoder(edge.clone(), codec::encode_edge);
        serializer.register_edge_decoder(EdgeRecord::TYPE_URL, move |r, g, ids| {
            codec::decode_edge(r, g, ids, &edge)
        });
        serializer.register_group_encoder(group.clone(), codec::encode_group);
        serializer.register_group_decoder(GroupRecord::TYPE_URL, move |r, g, ids| {
            codec::decode_group(r, g, ids, &group)
        });
        serializer
    }

    /// Class names handled by the default codecs
    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    /// Register (or replace) the encoder of node class `class_name`
    pub fn register_node_encoder(
        &mut self,
        class_name: impl Into<String>,
        encoder: impl Fn(&Node, &EncodeContext<'_>) -> Result<AnyRecord> + 'static,
    ) {
        self.node_encoders.insert(class_name.into(), Box::new(encoder));
    }

    /// Register (or replace) the encoder of edge class `class_name`
    pub fn register_edge_encoder(
        &mut self,
        class_name: impl Into<String>,
        encoder: impl Fn(&Edge, &EncodeContext<'_>) -> Result<AnyRecord> + 'static,
    ) {
        self.edge_encoders.insert(class_name.into(), Box::new(encoder));
    }

    /// Register (or replace) the encoder of group class `class_name`
    pub fn register_group_encoder(
        &mut self,
        class_name: impl Into<String>,
        encoder: impl Fn(&Group, &EncodeContext<'_>) -> Result<AnyRecord> + 'static,
    ) {
        self.group_encoders.insert(class_name.into(), Box::new(encoder));
    }

    /// Register (or replace) the decoder of node records tagged `type_url`
    pub fn register_node_decoder(
        &mut self,
        type_url: impl Into<String>,
        decoder: impl Fn(&AnyRecord, &mut Graph, &mut IdObjectMap) -> Result<NodeId> + 'static,
    ) {
        self.node_decoders.insert(type_url.into(), Box::new(decoder));
    }

    /// Register (or replace) the decoder of edge records tagged `type_url`
    pub fn register_edge_decoder(
        &mut self,
        type_url: impl Into<String>,
        decoder: impl Fn(&AnyRecord, &mut Graph, &mut IdObjectMap) -> Result<EdgeId> + 'static,
    ) {
        self.edge_decoders.insert(type_url.into(), Box::new(decoder));
    }

    /// Register (or replace) the decoder of group records tagged `type_url`
    pub fn register_group_decoder(
        &mut self,
        type_url: impl Into<String>,
        decoder: impl Fn(&AnyRecord, &mut Graph, &mut IdObjectMap) -> Result<GroupId> + 'static,
    ) {
        self.group_decoders.insert(type_url.into(), Box::new(decoder));
    }

    /// Write `graph` to `writer`
    pub fn serialize_out<W: Write>(
        &self,
        graph: &Graph,
        writer: &mut W,
        progress: &mut dyn ProgressNotifier,
    ) -> Result<SerializeReport> {
        self.serialize_out_with(graph, writer, progress, UserRecords::default())
    }

    /// Write `graph` and caller defined records to `writer`
    pub fn serialize_out_with<W: Write>(
        &self,
        graph: &Graph,
        writer: &mut W,
        progress: &mut dyn ProgressNotifier,
        user: UserRecords,
    ) -> Result<SerializeReport> {
        let (mut message, report) = self.encode(graph, progress);
        message.user1 = user.user1;
        message.user2 = user.user2;
        message.write_to(writer)?;

        if !report.is_complete() {
            tracing::warn!(
                graph = %graph.name(),
                "Partial serialization: nodes {}, edges {}, groups {}",
                report.nodes,
                report.edges,
                report.groups
            );
        }
        Ok(report)
    }

    /// Build the message describing `graph` without writing it
    pub fn encode(
        &self,
        graph: &Graph,
        progress: &mut dyn ProgressNotifier,
    ) -> (GraphMessage, SerializeReport) {
        let ids = ObjectIdMap::generate(graph);
        let nothing_written = IndexSet::new();
        let mut written = IndexSet::new();
        let mut message = GraphMessage::default();
        let mut report = SerializeReport::default();

        progress.begin_progress();
        progress.set_phase_count(3);

        progress.begin_phase("Saving nodes");
        let nodes: Vec<&Node> = graph.nodes().filter(|n| n.is_serializable()).collect();
        report.nodes.expected = nodes.len();
        let node_ctx = EncodeContext {
            graph,
            ids: &ids,
            written: &nothing_written,
        };
        for (index, node) in nodes.iter().copied().enumerate() {
            match self.node_encoders.get(node.class_name()) {
                Some(encoder) => match encoder(node, &node_ctx) {
                    Ok(record) => {
                        message.nodes.push(record);
                        written.insert(node.id());
                        report.nodes.processed += 1;
                    }
                    Err(e) => tracing::warn!("Node {} not serialized: {e}", node.id()),
                },
                None => tracing::warn!(
                    "No encoder available for node class {}, node {} skipped",
                    node.class_name(),
                    node.id()
                ),
            }
            progress.set_phase_progress(fraction(index + 1, nodes.len()));
        }

        let ctx = EncodeContext {
            graph,
            ids: &ids,
            written: &written,
        };

        progress.begin_phase("Saving edges");
        let edges: Vec<&Edge> = graph
            .edges()
            .filter(|e| {
                e.endpoints().is_some_and(|(src, dst)| {
                    [src, dst]
                        .iter()
                        .all(|n| graph.node(*n).is_some_and(Node::is_serializable))
                })
            })
            .collect();
        report.edges.expected = edges.len();
        for (index, edge) in edges.iter().copied().enumerate() {
            match self.edge_encoders.get(edge.class_name()) {
                Some(encoder) => match encoder(edge, &ctx) {
                    Ok(record) => {
                        message.edges.push(record);
                        report.edges.processed += 1;
                    }
                    Err(e) => tracing::warn!("Edge {} not serialized: {e}", edge.id()),
                },
                None => tracing::warn!(
                    "No encoder available for edge class {}, edge {} skipped",
                    edge.class_name(),
                    edge.id()
                ),
            }
            progress.set_phase_progress(fraction(index + 1, edges.len()));
        }

        progress.begin_phase("Saving groups");
        report.groups.expected = graph.group_count();
        for (index, group) in graph.groups().enumerate() {
            match self.group_encoders.get(group.class_name()) {
                Some(encoder) => match encoder(group, &ctx) {
                    Ok(record) => {
                        message.groups.push(record);
                        report.groups.processed += 1;
                    }
                    Err(e) => tracing::warn!("Group {} not serialized: {e}", group.id()),
                },
                None => tracing::warn!(
                    "No encoder available for group class {}, group {} skipped",
                    group.class_name(),
                    group.id()
                ),
            }
            progress.set_phase_progress(fraction(index + 1, graph.group_count()));
        }

        message.node_count = header_count(report.nodes.expected);
        message.edge_count = header_count(report.edges.expected);
        message.group_count = header_count(report.groups.expected);
        progress.end_progress();
        (message, report)
    }

    /// Read one message from `reader` and rebuild its primitives in `graph`.
    ///
    /// Nothing is created if the stream can't be read or decoded.
    pub fn serialize_in<R: Read>(
        &self,
        reader: &mut R,
        graph: &mut Graph,
        progress: &mut dyn ProgressNotifier,
    ) -> Result<DeserializeReport> {
        let message = GraphMessage::read_from(reader)?;
        let report = self.decode(message, graph, progress);
        if !report.is_complete() {
            tracing::warn!(
                graph = %graph.name(),
                "Partial deserialization: nodes {}, edges {}, groups {}",
                report.nodes,
                report.edges,
                report.groups
            );
        }
        Ok(report)
    }

    /// Rebuild the primitives of `message` in `graph`
    pub fn decode(
        &self,
        message: GraphMessage,
        graph: &mut Graph,
        progress: &mut dyn ProgressNotifier,
    ) -> DeserializeReport {
        let mut ids = IdObjectMap::new();
        let mut report = DeserializeReport {
            nodes: expected_from(message.node_count),
            edges: expected_from(message.edge_count),
            groups: expected_from(message.group_count),
            user1: message.user1,
            user2: message.user2,
        };

        progress.begin_progress();
        progress.set_phase_count(3);

        progress.begin_phase("Loading nodes");
        for (index, record) in message.nodes.iter().enumerate() {
            if decode_record(&self.node_decoders, "node", record, graph, &mut ids).is_some() {
                report.nodes.processed += 1;
            }
            progress.set_phase_progress(fraction(index + 1, message.nodes.len()));
        }

        // Edges need both endpoints, a group may end up with no member
        progress.begin_phase("Loading edges");
        if ids.node_count() > 0 {
            for (index, record) in message.edges.iter().enumerate() {
                if decode_record(&self.edge_decoders, "edge", record, graph, &mut ids).is_some() {
                    report.edges.processed += 1;
                }
                progress.set_phase_progress(fraction(index + 1, message.edges.len()));
            }
        } else {
            if !message.edges.is_empty() {
                tracing::warn!(
                    "No node could be loaded, {} edges skipped",
                    message.edges.len()
                );
            }
            progress.set_phase_progress(1.0);
        }

        progress.begin_phase("Loading groups");
        for (index, record) in message.groups.iter().enumerate() {
            if decode_record(&self.group_decoders, "group", record, graph, &mut ids).is_some() {
                report.groups.processed += 1;
            }
            progress.set_phase_progress(fraction(index + 1, message.groups.len()));
        }

        progress.end_progress();
        report
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("node_encoders", &self.node_encoders.keys().collect::<Vec<_>>())
            .field("edge_encoders", &self.edge_encoders.keys().collect::<Vec<_>>())
            .field("group_encoders", &self.group_encoders.keys().collect::<Vec<_>>())
            .field("node_decoders", &self.node_decoders.keys().collect::<Vec<_>>())
            .field("edge_decoders", &self.edge_decoders.keys().collect::<Vec<_>>())
            .field("group_decoders", &self.group_decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

type Decoder<T> = Box<dyn Fn(&AnyRecord, &mut Graph, &mut IdObjectMap) -> Result<T>>;

fn decode_record<T>(
    decoders: &IndexMap<String, Decoder<T>>,
    kind: &str,
    record: &AnyRecord,
    graph: &mut Graph,
    ids: &mut IdObjectMap,
) -> Option<T> {
    let Some(decoder) = decoders.get(&record.type_url) else {
        tracing::warn!("No decoder available for {kind} record {}, record skipped", record.type_url);
        return None;
    };
    match decoder(record, graph, ids) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("A {kind} record could not be loaded ({}): {e}", record.type_url);
            None
        }
    }
}

fn fraction(done: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    }
}

fn header_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

fn expected_from(count: i32) -> PrimitiveCount {
    PrimitiveCount {
        expected: usize::try_from(count).unwrap_or_default(),
        processed: 0,
    }
}
