// src/core/blocking.rs

//! Manages clients that are blocked waiting for data on list keys (`BLPOP`).

use crate::core::commands::list::logic::list_pop_logic;
use crate::core::storage::db::ExecutionContext;
use crate::core::{PyropeError, RespValue};
use bytes::Bytes;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

/// The value handed to a waiter when a blocking list pop is satisfied.
#[derive(Debug, Clone)]
pub struct PoppedValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// The waker sends the popped value directly, eliminating the need for a re-read.
type Waker = oneshot::Sender<PoppedValue>;

/// A shareable waker struct. The `Option` allows it to be `take()`-n to prevent multiple sends.
type SharedWaker = Arc<Mutex<Option<Waker>>>;

/// Holds information about a waiting client, including its session ID for cleanup.
#[derive(Clone, Debug)]
struct WaiterInfo {
    session_id: u64,
    waker: SharedWaker,
}

/// Manages all clients currently blocked on list operations.
///
/// Queues are strictly FIFO: the earliest-arriving waiter on a key is the one
/// that consumes the next pushed element.
#[derive(Debug, Default)]
pub struct BlockerManager {
    // Key: the name of the list key being watched.
    // Value: a queue of waiters for clients waiting on this key.
    waiters: DashMap<Bytes, VecDeque<WaiterInfo>>,
}

impl BlockerManager {
    /// Creates a new, empty `BlockerManager`.
    pub fn new() -> Self {
        Default::default()
    }

    /// Orchestrates a blocking list pop (`BLPOP`).
    ///
    /// The waker is registered *before* the shard lock held by `ctx` is
    /// released, and push-side hand-off runs under that same lock, so a push
    /// that lands between the non-blocking attempt and the park always finds
    /// either the element in the list or the waiter in the queue.
    pub async fn orchestrate_blocking_pop(
        self: &Arc<Self>,
        ctx: &mut ExecutionContext<'_>,
        key: &Bytes,
        wait_timeout: Duration,
    ) -> Result<RespValue, PyropeError> {
        // 1. Attempt a non-blocking pop first.
        if let Some(value) = list_pop_logic(ctx, key)? {
            return Ok(RespValue::Array(vec![
                RespValue::BulkString(key.clone()),
                RespValue::BulkString(value),
            ]));
        }

        // 2. Prepare for blocking.
        let (tx, mut rx) = oneshot::channel();
        let shared_waker = Arc::new(Mutex::new(Some(tx)));
        let waiter_info = WaiterInfo {
            session_id: ctx.session_id,
            waker: shared_waker.clone(),
        };

        // 3. Register the waker BEFORE releasing the shard lock.
        self.waiters
            .entry(key.clone())
            .or_default()
            .push_back(waiter_info);
        debug!(
            "Session {}: Registered to block on key: {}",
            ctx.session_id,
            String::from_utf8_lossy(key)
        );

        // 4. Release locks and enter the blocking wait.
        ctx.release_locks();
        let popped = match timeout(wait_timeout, &mut rx).await {
            Ok(Ok(popped)) => Some(popped),
            // Waker dropped without a send; treat as a timeout.
            Ok(Err(_)) => None,
            Err(_elapsed) => {
                // Timed out. If a pusher already claimed the waker, the value
                // is in flight and must not be lost; otherwise reclaim the
                // waker so no pusher can hand an element to a gone client.
                let claimed = shared_waker.lock().unwrap().take().is_none();
                if claimed { rx.await.ok() } else { None }
            }
        };

        // 5. Clean up the waiter and shape the reply.
        self.remove_waiter(key, &shared_waker);

        match popped {
            Some(popped) => Ok(RespValue::Array(vec![
                RespValue::BulkString(popped.key),
                RespValue::BulkString(popped.value),
            ])),
            None => Ok(RespValue::NullArray),
        }
    }

    /// Called by list write commands (`LPUSH`/`RPUSH`) while they hold the
    /// key's shard lock. Hands values, in the order a pop sequence would
    /// yield them, to the oldest live waiters; each handed value bypasses the
    /// list entirely. Returns how many values were consumed by waiters.
    pub fn notify_and_consume_for_push(&self, key: &Bytes, values_in_pop_order: &[Bytes]) -> usize {
        let mut consumed = 0;
        {
            let Some(mut queue) = self.waiters.get_mut(key) else {
                return 0;
            };
            while consumed < values_in_pop_order.len() {
                let Some(info) = queue.pop_front() else {
                    break;
                };
                // Skip stale waiters whose wakers were already reclaimed.
                let Some(waker) = info.waker.lock().unwrap().take() else {
                    continue;
                };
                let popped = PoppedValue {
                    key: key.clone(),
                    value: values_in_pop_order[consumed].clone(),
                };
                if waker.send(popped).is_ok() {
                    debug!(
                        "Atomically handed off value to a waiter for list key '{}'",
                        String::from_utf8_lossy(key)
                    );
                    consumed += 1;
                }
                // A failed send means the receiver is gone; retry the same
                // value with the next waiter in line.
            }
            if !queue.is_empty() {
                return consumed;
            }
        }
        self.waiters.remove_if(key, |_, queue| queue.is_empty());
        consumed
    }

    /// Removes a specific waker from a key's queue.
    fn remove_waiter(&self, key: &Bytes, waker_to_remove: &SharedWaker) {
        if let Some(mut queue) = self.waiters.get_mut(key) {
            queue.retain(|info| !Arc::ptr_eq(&info.waker, waker_to_remove));
            if !queue.is_empty() {
                return;
            }
        }
        self.waiters.remove_if(key, |_, queue| queue.is_empty());
    }

    /// Removes all wakers for a given session_id upon client disconnection.
    pub fn remove_waiters_for_session(&self, session_id: u64) {
        self.waiters.iter_mut().for_each(|mut queue| {
            queue.retain(|info| info.session_id != session_id);
        });
        self.waiters.retain(|_, queue| !queue.is_empty());
        debug!("Removed any pending blockers for session_id {}.", session_id);
    }
}
