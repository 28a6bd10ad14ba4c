// src/core/commands/list/blpop.rs

//! Implements the `BLPOP` command.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, extract_string, validate_arg_count};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Represents the `BLPOP` command with its parsed arguments.
/// `BLPOP key timeout` — the timeout is in decimal seconds, `0` meaning
/// "wait forever".
#[derive(Debug, Clone, Default)]
pub struct BLPop {
    pub key: Bytes,
    pub timeout: Duration,
}

impl ParseCommand for BLPop {
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError> {
        validate_arg_count(args, 2, "BLPOP")?;
        let key = extract_bytes(&args[0])?;

        let timeout_secs: f64 = extract_string(&args[1])?.parse().map_err(|_| {
            PyropeError::InvalidArgument {
                cmd: "BLPOP",
                reason: "expected number for timeout".to_string(),
            }
        })?;
        if timeout_secs < 0.0 || !timeout_secs.is_finite() {
            return Err(PyropeError::InvalidArgument {
                cmd: "BLPOP",
                reason: "expected number for timeout".to_string(),
            });
        }
        let timeout = if timeout_secs == 0.0 {
            Duration::from_secs(u64::MAX)
        } else {
            Duration::from_secs_f64(timeout_secs)
        };

        Ok(BLPop { key, timeout })
    }
}

#[async_trait]
impl ExecutableCommand for BLPop {
    /// Executes the `BLPOP` command.
    /// The blocking logic, including race condition prevention and FIFO
    /// waiter ordering, is delegated to the central `BlockerManager`.
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        let state = ctx.state.clone();
        state
            .blocker_manager
            .orchestrate_blocking_pop(ctx, &self.key, self.timeout)
            .await
    }
}
