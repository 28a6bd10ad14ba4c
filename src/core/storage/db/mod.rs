// src/core/storage/db/mod.rs

//! The sharded keyspace storage engine.
//! This module defines the `Db` struct, a sharded in-memory key-value store,
//! along with the locking mechanism and the execution context for commands.

pub mod context;
pub mod core;
pub mod locking;
pub mod shard;

pub use self::core::{Db, NUM_SHARDS, PushDirection};
pub use context::ExecutionContext;
pub use locking::ExecutionLocks;
pub use shard::{DbShard, ShardCache};
