// src/core/commands/generic/echo.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default)]
pub struct Echo {
    pub message: Bytes,
}

impl ParseCommand for Echo {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        validate_arg_count(args, 1, "ECHO")?;
        let message = extract_bytes(&args[0])?;
        // An empty message is rejected, matching the wire contract.
        if message.is_empty() {
            return Err(PyropeError::WrongArgumentCount("ECHO".to_string()));
        }
        Ok(Echo { message })
    }
}

#[async_trait]
impl ExecutableCommand for Echo {
    async fn execute<'a>(&self, _ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        Ok(RespValue::BulkString(self.message.clone()))
    }
}
