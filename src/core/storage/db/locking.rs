// src/core/storage/db/locking.rs

use super::core::Db;
use super::shard::ShardCache;
use crate::core::Command;
use tokio::sync::MutexGuard;

/// `ExecutionLocks` holds the `MutexGuard`s required to execute a command.
/// Holding the guard for the whole execution is what makes each command
/// atomic with respect to every other command touching the same key.
pub enum ExecutionLocks<'a> {
    /// A lock on a single keyspace shard.
    Single {
        shard_index: usize,
        guard: MutexGuard<'a, ShardCache>,
    },
    /// No locks are required for this command.
    None,
}

impl Db {
    /// Determines and acquires the appropriate locks for a given command based
    /// on the keys it operates on. Every current command touches at most one
    /// key, so one shard guard is always sufficient.
    pub async fn determine_locks_for_command<'a>(&'a self, command: &Command) -> ExecutionLocks<'a> {
        match command.get_keys().first() {
            Some(key) => {
                let shard_index = self.get_shard_index(key);
                ExecutionLocks::Single {
                    shard_index,
                    guard: self.get_shard(shard_index).entries.lock().await,
                }
            }
            None => ExecutionLocks::None,
        }
    }
}
