// src/core/storage/stream.rs

//! The append-only stream value type and its ID arithmetic.

use crate::core::PyropeError;
use bytes::Bytes;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

// --- Stream ID ---

/// A stream entry ID: a `(milliseconds, sequence)` pair ordered lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Default)]
pub struct StreamId {
    pub timestamp_ms: u64,
    pub sequence: u64,
}

impl StreamId {
    pub const MIN: Self = Self {
        timestamp_ms: 0,
        sequence: 0,
    };
    pub const MAX: Self = Self {
        timestamp_ms: u64::MAX,
        sequence: u64::MAX,
    };

    pub fn new(timestamp_ms: u64, sequence: u64) -> Self {
        Self {
            timestamp_ms,
            sequence,
        }
    }
}

impl FromStr for StreamId {
    type Err = PyropeError;

    /// Accepts `<ms>` (sequence defaults to 0) and `<ms>-<seq>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let reject = || PyropeError::StreamIdRejected("Invalid stream ID specified".to_string());
        let parts: Vec<&str> = s.split('-').collect();
        match parts.len() {
            1 => {
                let timestamp_ms = parts[0].parse().map_err(|_| reject())?;
                Ok(StreamId::new(timestamp_ms, 0))
            }
            2 => {
                let timestamp_ms = parts[0].parse().map_err(|_| reject())?;
                let sequence = parts[1].parse().map_err(|_| reject())?;
                Ok(StreamId::new(timestamp_ms, sequence))
            }
            _ => Err(reject()),
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.timestamp_ms, self.sequence)
    }
}

/// The ID argument of an XADD, before resolution against the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamIdSpec {
    /// `*`: both parts auto-generated from the wall clock.
    Auto,
    /// `<ms>-*` or a bare `<ms>`: explicit milliseconds, auto sequence.
    AutoSeq(u64),
    /// `<ms>-<seq>`: fully explicit.
    Explicit(StreamId),
}

impl FromStr for StreamIdSpec {
    type Err = PyropeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(StreamIdSpec::Auto);
        }
        if let Some(ms_str) = s.strip_suffix("-*") {
            let ms = ms_str.parse().map_err(|_| {
                PyropeError::StreamIdRejected("Invalid stream ID specified".to_string())
            })?;
            return Ok(StreamIdSpec::AutoSeq(ms));
        }
        if !s.contains('-') {
            let ms = s.parse().map_err(|_| {
                PyropeError::StreamIdRejected("Invalid stream ID specified".to_string())
            })?;
            return Ok(StreamIdSpec::AutoSeq(ms));
        }
        Ok(StreamIdSpec::Explicit(s.parse()?))
    }
}

// --- Stream Entry ---

/// One stream entry: an ID plus field-value pairs in XADD argument order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: StreamId,
    pub fields: IndexMap<Bytes, Bytes>,
}

// --- Main Stream Struct ---

/// An append-only log of entries with strictly increasing IDs.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    pub entries: BTreeMap<StreamId, StreamEntry>,
    pub last_id: StreamId,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves an ID spec against the current top entry and appends.
    ///
    /// Auto-sequence policy: if the top entry shares the milliseconds part,
    /// the next sequence is `top.seq + 1`; otherwise `1` for `ms == 0` (the
    /// `0-0` sentinel is not a legal ID) and `0` for everything else.
    pub fn add_entry(
        &mut self,
        id_spec: StreamIdSpec,
        fields: IndexMap<Bytes, Bytes>,
    ) -> Result<StreamId, PyropeError> {
        let new_id = match id_spec {
            StreamIdSpec::Auto => {
                let now_ms = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_err(|e| PyropeError::Internal(e.to_string()))?
                    .as_millis() as u64;
                StreamId::new(now_ms, self.auto_sequence(now_ms))
            }
            StreamIdSpec::AutoSeq(ms) => StreamId::new(ms, self.auto_sequence(ms)),
            StreamIdSpec::Explicit(id) => id,
        };

        if new_id == StreamId::MIN {
            return Err(PyropeError::StreamIdRejected(
                "The ID specified in XADD must be greater than 0-0".to_string(),
            ));
        }
        if !self.entries.is_empty() && new_id <= self.last_id {
            return Err(PyropeError::StreamIdRejected(
                "The ID specified in XADD is equal or smaller than the target stream top item"
                    .to_string(),
            ));
        }

        self.entries.insert(new_id, StreamEntry { id: new_id, fields });
        self.last_id = new_id;
        Ok(new_id)
    }

    /// The sequence number an auto-filled ID gets for the given milliseconds.
    fn auto_sequence(&self, ms: u64) -> u64 {
        match self.entries.last_key_value() {
            Some((top, _)) if top.timestamp_ms == ms => top.sequence + 1,
            _ if ms == 0 => 1,
            _ => 0,
        }
    }

    /// Entries whose ID falls in the inclusive `[start, end]` range.
    pub fn range(&self, start: StreamId, end: StreamId) -> impl Iterator<Item = &StreamEntry> {
        self.entries
            .range((Bound::Included(start), Bound::Included(end)))
            .map(|(_, entry)| entry)
    }

    /// Entries whose ID is strictly greater than `exclusive_id`.
    ///
    /// Implemented with an excluded lower bound rather than by incrementing
    /// the caller's sequence number, which would wrap at `u64::MAX`.
    pub fn read_after(&self, exclusive_id: StreamId) -> impl Iterator<Item = &StreamEntry> {
        self.entries
            .range((Bound::Excluded(exclusive_id), Bound::Unbounded))
            .map(|(_, entry)| entry)
    }
}
