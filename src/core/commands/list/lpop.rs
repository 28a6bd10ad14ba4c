// src/core/commands/list/lpop.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string};
use crate::core::commands::list::logic::list_pop_logic;
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// `LPOP key [count]`. Without a count the reply is a bulk string (or a null
/// bulk for an absent/empty list); with a count it is always an array.
#[derive(Debug, Clone, Default)]
pub struct LPop {
    pub key: Bytes,
    pub count: Option<usize>,
}

impl ParseCommand for LPop {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        let count = match args.len() {
            1 => None,
            2 => {
                let raw: i64 = extract_string(&args[1])?.parse().map_err(|_| {
                    PyropeError::InvalidArgument {
                        cmd: "LPOP",
                        reason: "expected integer for count".to_string(),
                    }
                })?;
                // Negative counts behave as zero.
                Some(raw.max(0) as usize)
            }
            _ => return Err(PyropeError::WrongArgumentCount("LPOP".to_string())),
        };
        Ok(LPop {
            key: extract_bytes(&args[0])?,
            count,
        })
    }
}

#[async_trait]
impl ExecutableCommand for LPop {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        match self.count {
            None => Ok(match list_pop_logic(ctx, &self.key)? {
                Some(value) => RespValue::BulkString(value),
                None => RespValue::Null,
            }),
            Some(count) => {
                let mut popped = Vec::new();
                while popped.len() < count {
                    match list_pop_logic(ctx, &self.key)? {
                        Some(value) => popped.push(RespValue::BulkString(value)),
                        None => break,
                    }
                }
                Ok(RespValue::Array(popped))
            }
        }
    }
}
