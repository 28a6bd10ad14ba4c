// src/core/commands/streams/xread.rs

//! Implements the single-stream form of `XREAD`:
//! `XREAD STREAMS <key> <id>`, returning the entries with IDs strictly
//! greater than the one supplied.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::commands::streams::xrange::XRange;
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::storage::stream::StreamId;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct XRead {
    pub key: Bytes,
    /// The exclusive lower bound: only entries with a strictly greater ID
    /// are returned.
    pub after_id: StreamId,
}

impl ParseCommand for XRead {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        validate_arg_count(args, 3, "XREAD")?;
        let keyword = extract_string(&args[0])?;
        if !keyword.eq_ignore_ascii_case("STREAMS") {
            return Err(PyropeError::InvalidArgument {
                cmd: "XREAD",
                reason: format!("expected STREAMS keyword, but got {keyword}"),
            });
        }
        Ok(XRead {
            key: extract_bytes(&args[1])?,
            after_id: extract_string(&args[2])?.parse()?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for XRead {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        let (_, guard) = ctx.get_single_shard_context_mut(&self.key)?;

        let missing = PyropeError::InvalidArgument {
            cmd: "XREAD",
            reason: format!("no stream stored with {}", String::from_utf8_lossy(&self.key)),
        };
        let Some(entry) = guard.get_mut(&self.key) else {
            return Err(missing);
        };
        if entry.is_expired() {
            guard.pop(&self.key);
            return Err(missing);
        }
        let DataValue::Stream(stream) = &entry.data else {
            return Err(PyropeError::WrongType);
        };

        // Exclusivity is strict ID comparison, never an incremented sequence
        // number, which would be wrong for a saturated sequence.
        let entries: Vec<RespValue> = stream
            .read_after(self.after_id)
            .map(XRange::format_entry)
            .collect();

        // Reply shape: [[key, [entry, ...]]].
        Ok(RespValue::Array(vec![RespValue::Array(vec![
            RespValue::BulkString(self.key.clone()),
            RespValue::Array(entries),
        ])]))
    }
}
