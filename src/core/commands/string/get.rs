// src/core/commands/string/get.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::data_types::DataValue;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Get {
    pub key: Bytes,
}

impl ParseCommand for Get {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        validate_arg_count(args, 1, "GET")?;
        Ok(Get {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Get {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        let (_, guard) = ctx.get_single_shard_context_mut(&self.key)?;

        let found = guard.peek(&self.key).map(|entry| {
            let value = match &entry.data {
                DataValue::String(s) => Some(s.clone()),
                _ => None,
            };
            (entry.is_expired(), value)
        });
        match found {
            None => Ok(RespValue::Null),
            Some((true, _)) => {
                // Lazy expiry: a read past the deadline removes the key.
                guard.pop(&self.key);
                Ok(RespValue::Null)
            }
            Some((false, Some(s))) => Ok(RespValue::BulkString(s)),
            Some((false, None)) => Err(PyropeError::WrongType),
        }
    }
}
