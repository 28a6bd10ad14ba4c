// src/core/commands/command_trait.rs

//! Defines the core traits for all executable commands.

use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;

/// A trait for the actual execution logic of a command.
/// Implemented by each command's struct (e.g., `Get`, `Set`).
#[async_trait]
pub trait ExecutableCommand {
    /// The core logic for the command's execution. The `ExecutionContext`
    /// holds the shard lock for the command's key, making the execution
    /// atomic with respect to other commands on that key.
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError>;
}

/// A trait for parsing a command's arguments from a slice of `RespFrame`.
/// Parse failures never touch the keyspace.
pub trait ParseCommand: Sized {
    /// Parses the arguments and returns an instance of the command struct.
    fn parse(args: &[RespFrame]) -> Result<Self, PyropeError>;
}
