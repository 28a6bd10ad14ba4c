// src/core/storage/db/context.rs

use super::core::Db;
use super::locking::ExecutionLocks;
use super::shard::{DbShard, ShardCache};
use crate::core::PyropeError;
use crate::core::state::ServerState;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::MutexGuard;

/// `ExecutionContext` provides all the state and locks required to execute a `Command`.
pub struct ExecutionContext<'a> {
    pub state: Arc<ServerState>,
    pub locks: ExecutionLocks<'a>,
    pub db: &'a Db,
    pub session_id: u64,
}

impl<'a> ExecutionContext<'a> {
    /// A helper to get a key's shard and the held lock guard from the context.
    pub fn get_single_shard_context_mut(
        &mut self,
        key: &Bytes,
    ) -> Result<(&Arc<DbShard>, &mut MutexGuard<'a, ShardCache>), PyropeError> {
        let shard_index = self.db.get_shard_index(key);
        let shard = self.db.get_shard(shard_index);
        match &mut self.locks {
            ExecutionLocks::Single { shard_index: held, guard } if *held == shard_index => {
                Ok((shard, guard))
            }
            ExecutionLocks::Single { .. } => Err(PyropeError::Internal(
                "Held shard lock does not cover the requested key".into(),
            )),
            ExecutionLocks::None => Err(PyropeError::Internal(
                "Command expected a shard lock".into(),
            )),
        }
    }

    /// Releases all locks held by the context. Used by blocking commands
    /// before parking so other connections can reach the keyspace.
    pub fn release_locks(&mut self) {
        self.locks = ExecutionLocks::None;
    }
}
