// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binary wire format.
//!
//! A serialized graph is a single [`GraphMessage`] encoded with `bincode`.
//! Primitives are stored as [`AnyRecord`]s: a type url followed by the
//! encoded concrete record, so a stream can mix primitive classes that
//! only their own codec knows how to read.

use crate::error::{Result, SerializeError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// A concrete record type that can be packed in an [`AnyRecord`]
pub trait Record: Serialize + DeserializeOwned {
    /// Tag identifying this record type in a stream
    const TYPE_URL: &'static str;
}

/// Type-tagged opaque record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnyRecord {
    /// Type url of the packed record
    pub type_url: String,
    /// Encoded record
    pub value: Vec<u8>,
}

impl AnyRecord {
    /// Encode `record` and tag it with its type url
    pub fn pack<T: Record>(record: &T) -> Result<Self> {
        Ok(Self {
            type_url: T::TYPE_URL.to_string(),
            value: bincode::serialize(record)?,
        })
    }

    /// Whether this record holds a `T`
    pub fn is<T: Record>(&self) -> bool {
        self.type_url == T::TYPE_URL
    }

    /// Decode the packed record as a `T`
    pub fn unpack<T: Record>(&self) -> Result<T> {
        if !self.is::<T>() {
            return Err(SerializeError::UnexpectedRecord {
                expected: T::TYPE_URL,
                found: self.type_url.clone(),
            });
        }
        Ok(bincode::deserialize(&self.value)?)
    }
}

/// Label and geometry of a node, with its id in the stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
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
    /// Stream id, -1 if unmapped
    pub node_id: i32,
}

impl Record for NodeRecord {
    const TYPE_URL: &'static str = "trellis.pb/trellis.Node";
}

/// Directed edge between two stream node ids
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Stream id, -1 if unmapped
    pub edge_id: i32,
    /// Stream id of the source node
    pub src_node_id: i32,
    /// Stream id of the destination node
    pub dst_node_id: i32,
    /// Edge weight
    pub weight: f64,
}

impl Record for EdgeRecord {
    const TYPE_URL: &'static str = "trellis.pb/trellis.Edge";
}

/// Group label, geometry and members
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
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
    /// Stream id, -1 if unmapped
    pub group_id: i32,
    /// Stream ids of member nodes
    pub node_ids: Vec<i32>,
}

impl Record for GroupRecord {
    const TYPE_URL: &'static str = "trellis.pb/trellis.Group";
}

/// Top level message of a serialized graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMessage {
    /// Number of nodes eligible for serialization
    pub node_count: i32,
    /// Number of edges eligible for serialization
    pub edge_count: i32,
    /// Number of groups eligible for serialization
    pub group_count: i32,
    /// Node records
    pub nodes: Vec<AnyRecord>,
    /// Edge records
    pub edges: Vec<AnyRecord>,
    /// Group records
    pub groups: Vec<AnyRecord>,
    /// First caller defined extension
    pub user1: Option<AnyRecord>,
    /// Second caller defined extension
    pub user2: Option<AnyRecord>,
}

impl GraphMessage {
    /// Encode the whole message and write it to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = bincode::serialize(self)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Read `reader` to its end and decode one message
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bincode::deserialize(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_record_type_check() {
        let node = NodeRecord {
            label: "A".into(),
            node_id: 1,
            ..Default::default()
        };
        let any = AnyRecord::pack(&node).unwrap();
        assert!(any.is::<NodeRecord>());
        assert!(!any.is::<EdgeRecord>());
        assert_eq!(any.unpack::<NodeRecord>().unwrap(), node);
        assert!(matches!(
            any.unpack::<GroupRecord>(),
            Err(SerializeError::UnexpectedRecord { expected, .. }) if expected == GroupRecord::TYPE_URL
        ));
    }

    #[test]
    fn test_message_stream() {
        let message = GraphMessage {
            node_count: 1,
            nodes: vec![AnyRecord::pack(&NodeRecord::default()).unwrap()],
            user1: Some(AnyRecord::pack(&EdgeRecord::default()).unwrap()),
            ..Default::default()
        };
        let mut buffer = Vec::new();
        message.write_to(&mut buffer).unwrap();
        let loaded = GraphMessage::read_from(&mut buffer.as_slice()).unwrap();
        assert_eq!(loaded, message);
    }

    #[test]
    fn test_truncated_stream() {
        let message = GraphMessage {
            nodes: vec![AnyRecord::pack(&NodeRecord::default()).unwrap()],
            ..Default::default()
        };
        let mut buffer = Vec::new();
        message.write_to(&mut buffer).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(matches!(
            GraphMessage::read_from(&mut buffer.as_slice()),
            Err(SerializeError::Encoding(_))
        ));
    }
}
