// src/core/commands/streams/xrange.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::{StreamEntry, StreamId};
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct XRange {
    pub key: Bytes,
    pub start: StreamId,
    pub end: StreamId,
}

/// Parses an XRANGE boundary. `-` is the smallest possible start, `+` an
/// unbounded end. A bare `<ms>` covers the whole millisecond: sequence 0 as
/// a start, the maximum sequence as an end.
fn parse_range_boundary(s: &str, is_start: bool) -> Result<StreamId, PyropeError> {
    match s {
        "-" => Ok(StreamId::MIN),
        "+" => Ok(StreamId::MAX),
        _ if !s.contains('-') => {
            let ms = s.parse().map_err(|_| {
                PyropeError::StreamIdRejected("Invalid stream ID specified".to_string())
            })?;
            let seq = if is_start { 0 } else { u64::MAX };
            Ok(StreamId::new(ms, seq))
        }
        _ => s.parse(),
    }
}

impl ParseCommand for XRange {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        validate_arg_count(args, 3, "XRANGE")?;
        Ok(XRange {
            key: extract_bytes(&args[0])?,
            start: parse_range_boundary(&extract_string(&args[1])?, true)?,
            end: parse_range_boundary(&extract_string(&args[2])?, false)?,
        })
    }
}

impl XRange {
    /// Formats one stream entry as `[id, [field, value, ...]]`.
    pub fn format_entry(entry: &StreamEntry) -> RespValue {
        let mut fields_array = Vec::with_capacity(entry.fields.len() * 2);
        for (k, v) in &entry.fields {
            fields_array.push(RespValue::BulkString(k.clone()));
            fields_array.push(RespValue::BulkString(v.clone()));
        }
        RespValue::Array(vec![
            RespValue::BulkString(entry.id.to_string().into()),
            RespValue::Array(fields_array),
        ])
    }
}

#[async_trait]
impl ExecutableCommand for XRange {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        let (_, guard) = ctx.get_single_shard_context_mut(&self.key)?;

        let Some(entry) = guard.get_mut(&self.key) else {
            return Ok(RespValue::Array(vec![]));
        };
        if entry.is_expired() {
            guard.pop(&self.key);
            return Ok(RespValue::Array(vec![]));
        }
        let DataValue::Stream(stream) = &entry.data else {
            return Err(PyropeError::WrongType);
        };

        let results = stream
            .range(self.start, self.end)
            .map(Self::format_entry)
            .collect();
        Ok(RespValue::Array(results))
    }
}
