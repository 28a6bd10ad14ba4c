// src/core/storage/data_types.rs

//! Defines the core data structures for storing values in the database,
//! such as `StoredValue` and the `DataValue` enum.

use crate::core::storage::stream::Stream;
use bytes::Bytes;
use std::collections::VecDeque;
use std::time::Instant;

/// A wrapper for all values stored in the database, containing the data and metadata.
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub data: DataValue,
    /// The absolute deadline after which the value is considered expired.
    pub expiry: Option<Instant>,
    /// Bumped on every write. Expiry timers capture this as a token so that a
    /// timer scheduled for an old deadline never removes a rewritten value.
    pub version: u64,
}

impl StoredValue {
    /// Creates a new `StoredValue` with no expiry.
    pub fn new(data: DataValue) -> Self {
        Self {
            data,
            expiry: None,
            version: 1,
        }
    }

    /// Checks whether the value's deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= Instant::now())
    }
}

/// The tagged union of value types a key can hold. Every typed command checks
/// this tag first; a mismatch is a WRONGTYPE error.
#[derive(Debug, Clone)]
pub enum DataValue {
    String(Bytes),
    List(VecDeque<Bytes>),
    Stream(Stream),
}

impl DataValue {
    /// The type name reported by the TYPE command.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::String(_) => "string",
            DataValue::List(_) => "list",
            DataValue::Stream(_) => "stream",
        }
    }
}
