// src/core/commands/mod.rs

//! This module defines all supported commands, organizes them into categories,
//! and provides the central `Command` enum that encapsulates their parsed state.

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::protocol::RespFrame;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

pub mod command_trait;
pub mod generic;
pub mod helpers;
pub mod list;
pub mod streams;
pub mod string;

use generic::{Echo, Ping, TypeInfo};
use list::{BLPop, LLen, LPop, LPush, LRange, RPush};
use streams::{XAdd, XRange, XRead};
use string::{Get, Set};

/// A fully parsed client command. Constructed from an inbound `RespFrame`
/// array; the name match is case-insensitive, the arguments stay raw bytes.
#[derive(Debug, Clone)]
pub enum Command {
    Ping(Ping),
    Echo(Echo),
    Set(Set),
    Get(Get),
    RPush(RPush),
    LPush(LPush),
    LPop(LPop),
    LRange(LRange),
    LLen(LLen),
    BLPop(BLPop),
    Type(TypeInfo),
    XAdd(XAdd),
    XRange(XRange),
    XRead(XRead),
}

impl TryFrom<RespFrame> for Command {
    type Error = PyropeError;

    fn try_from(frame: RespFrame) -> Result<Self, Self::Error> {
        let RespFrame::Array(parts) = frame else {
            return Err(PyropeError::Protocol("expected array".to_string()));
        };
        let Some((name_frame, args)) = parts.split_first() else {
            return Err(PyropeError::Protocol("empty command array".to_string()));
        };
        let RespFrame::BulkString(name_bytes) = name_frame else {
            return Err(PyropeError::Protocol("expected bulk string".to_string()));
        };
        // Only the command name is uppercased, never the arguments.
        let name = String::from_utf8_lossy(name_bytes).to_ascii_uppercase();

        let command = match name.as_str() {
            "PING" => Command::Ping(Ping::parse(args)?),
            "ECHO" => Command::Echo(Echo::parse(args)?),
            "SET" => Command::Set(Set::parse(args)?),
            "GET" => Command::Get(Get::parse(args)?),
            "RPUSH" => Command::RPush(RPush::parse(args)?),
            "LPUSH" => Command::LPush(LPush::parse(args)?),
            "LPOP" => Command::LPop(LPop::parse(args)?),
            "LRANGE" => Command::LRange(LRange::parse(args)?),
            "LLEN" => Command::LLen(LLen::parse(args)?),
            "BLPOP" => Command::BLPop(BLPop::parse(args)?),
            "TYPE" => Command::Type(TypeInfo::parse(args)?),
            "XADD" => Command::XAdd(XAdd::parse(args)?),
            "XRANGE" => Command::XRange(XRange::parse(args)?),
            "XREAD" => Command::XRead(XRead::parse(args)?),
            _ => return Err(PyropeError::UnknownCommand(name)),
        };
        Ok(command)
    }
}

impl Command {
    /// The canonical lowercase name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping(_) => "ping",
            Command::Echo(_) => "echo",
            Command::Set(_) => "set",
            Command::Get(_) => "get",
            Command::RPush(_) => "rpush",
            Command::LPush(_) => "lpush",
            Command::LPop(_) => "lpop",
            Command::LRange(_) => "lrange",
            Command::LLen(_) => "llen",
            Command::BLPop(_) => "blpop",
            Command::Type(_) => "type",
            Command::XAdd(_) => "xadd",
            Command::XRange(_) => "xrange",
            Command::XRead(_) => "xread",
        }
    }

    /// The keys this command reads or writes, used to acquire shard locks.
    pub fn get_keys(&self) -> Vec<Bytes> {
        match self {
            Command::Ping(_) | Command::Echo(_) => vec![],
            Command::Set(c) => vec![c.key.clone()],
            Command::Get(c) => vec![c.key.clone()],
            Command::RPush(c) => vec![c.key.clone()],
            Command::LPush(c) => vec![c.key.clone()],
            Command::LPop(c) => vec![c.key.clone()],
            Command::LRange(c) => vec![c.key.clone()],
            Command::LLen(c) => vec![c.key.clone()],
            Command::BLPop(c) => vec![c.key.clone()],
            Command::Type(c) => vec![c.key.clone()],
            Command::XAdd(c) => vec![c.key.clone()],
            Command::XRange(c) => vec![c.key.clone()],
            Command::XRead(c) => vec![c.key.clone()],
        }
    }
}

#[async_trait]
impl ExecutableCommand for Command {
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>) -> Result<RespValue, PyropeError> {
        match self {
            Command::Ping(c) => c.execute(ctx).await,
            Command::Echo(c) => c.execute(ctx).await,
            Command::Set(c) => c.execute(ctx).await,
            Command::Get(c) => c.execute(ctx).await,
            Command::RPush(c) => c.execute(ctx).await,
            Command::LPush(c) => c.execute(ctx).await,
            Command::LPop(c) => c.execute(ctx).await,
            Command::LRange(c) => c.execute(ctx).await,
            Command::LLen(c) => c.execute(ctx).await,
            Command::BLPop(c) => c.execute(ctx).await,
            Command::Type(c) => c.execute(ctx).await,
            Command::XAdd(c) => c.execute(ctx).await,
            Command::XRange(c) => c.execute(ctx).await,
            Command::XRead(c) => c.execute(ctx).await,
        }
    }
}
