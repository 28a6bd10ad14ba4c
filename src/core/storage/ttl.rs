// src/core/storage/ttl.rs

//! One-shot expiry timers for keys with a TTL.
//!
//! Lazy checks on every read are what make expiry correct; these timers only
//! reclaim memory for keys that are never touched again. Each timer captures
//! the value's version as a token and removes the key only while that token
//! still matches, so a timer for a superseded deadline can never delete a
//! rewritten value.

use crate::core::storage::db::Db;
use bytes::Bytes;
use std::time::Instant;
use tracing::debug;

/// Schedules removal of `key` at `deadline`, guarded by the version `token`
/// captured when the deadline was set.
pub fn schedule_removal(db: Db, key: Bytes, deadline: Instant, token: u64) {
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline.into()).await;

        let shard_index = db.get_shard_index(&key);
        let mut guard = db.get_shard(shard_index).entries.lock().await;

        let still_ours = guard
            .peek(&key)
            .is_some_and(|entry| entry.version == token && entry.is_expired());
        if still_ours {
            guard.pop(&key);
            debug!("Expired key '{}' removed by timer", String::from_utf8_lossy(&key));
        }
    });
}
