// src/core/commands/list/lrange.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct LRange {
    pub key: Bytes,
    pub start: i64,
    pub stop: i64,
}

impl ParseCommand for LRange {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        validate_arg_count(args, 3, "LRANGE")?;
        let index_err = || PyropeError::InvalidArgument {
            cmd: "LRANGE",
            reason: "expected integer for start, end".to_string(),
        };
        Ok(LRange {
            key: extract_bytes(&args[0])?,
            start: extract_string(&args[1])?.parse().map_err(|_| index_err())?,
            stop: extract_string(&args[2])?.parse().map_err(|_| index_err())?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LRange {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        let (_, guard) = ctx.get_single_shard_context_mut(&self.key)?;

        let Some(entry) = guard.get_mut(&self.key) else {
            return Ok(RespValue::Array(vec![]));
        };
        if entry.is_expired() {
            guard.pop(&self.key);
            return Ok(RespValue::Array(vec![]));
        }
        let DataValue::List(list) = &entry.data else {
            return Err(PyropeError::WrongType);
        };

        // Normalize negative indices against the list length; the slice is
        // inclusive on both ends.
        let len = list.len() as i64;
        let start = if self.start < 0 {
            (len + self.start).max(0)
        } else {
            self.start
        };
        let stop = if self.stop < 0 {
            (len + self.stop).min(len - 1)
        } else {
            self.stop.min(len - 1)
        };
        if start >= len || start > stop {
            return Ok(RespValue::Array(vec![]));
        }

        let start = start as usize;
        let stop = stop as usize;
        let values = list
            .iter()
            .skip(start)
            .take(stop - start + 1)
            .cloned()
            .map(RespValue::BulkString)
            .collect();
        Ok(RespValue::Array(values))
    }
}
