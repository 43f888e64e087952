// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binary structural serialization for `trellis_graph` graphs.
//!
//! This crate provides:
//! - A type-tagged record format written with `bincode`
//! - Dense id maps recording edge endpoints and group members by reference
//! - A codec registry dispatching on class names and record types
//! - Progress notification hooks
//!
//! Serialization is best effort: primitives that can't be written or
//! rebuilt are skipped and accounted for in the returned report.

pub mod codec;
pub mod error;
pub mod format;
pub mod id_map;
pub mod progress;
pub mod serializer;

pub use codec::EncodeContext;
pub use error::{Result, SerializeError};
pub use format::{AnyRecord, EdgeRecord, GraphMessage, GroupRecord, NodeRecord, Record};
pub use id_map::{IdObjectMap, ObjectIdMap, ObjectKey};
pub use progress::{ProgressNotifier, TracingProgress, VoidProgress};
pub use serializer::{
    ClassNames, DeserializeReport, PrimitiveCount, SerializeReport, Serializer, UserRecords,
};
