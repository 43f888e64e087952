// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serialization errors.

use thiserror::Error;
use trellis_graph::{EdgeId, TopologyError};

/// Serialization errors
#[derive(Debug, Error)]
pub enum SerializeError {
    /// Reading or writing the stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A message or record could not be encoded or decoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    /// Rebuilding a primitive was rejected by the graph
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// A record references an id missing from the id map
    #[error("Unresolved object id: {0}")]
    UnresolvedId(i32),

    /// A codec was handed a record of another type
    #[error("Unexpected record type: expected {expected}, found {found}")]
    UnexpectedRecord {
        /// Type url the codec handles
        expected: &'static str,
        /// Type url of the record
        found: String,
    },

    /// An edge has no source or destination
    #[error("Edge {0} has a missing endpoint")]
    MissingEndpoint(EdgeId),
}

/// Result type for serialization operations
pub type Result<T> = std::result::Result<T, SerializeError>;
