// src/core/storage/db/shard.rs

//! Defines the `DbShard` and `ShardCache` structs, which form the fundamental
//! storage units within a `Db`.

use crate::core::storage::data_types::StoredValue;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// A `DbShard` is a single, concurrent slice of the database.
/// It contains a mutex-guarded `ShardCache` and an atomic key counter.
#[derive(Debug)]
pub struct DbShard {
    /// The actual key-value store, protected by a Mutex for thread-safe access.
    pub entries: Mutex<ShardCache>,
    /// An atomic counter for the total number of keys in this shard.
    pub key_count: Arc<AtomicUsize>,
}

/// A `ShardCache` wraps the key-value map and keeps the key counter accurate
/// across every insertion and removal path.
#[derive(Debug)]
pub struct ShardCache {
    store: HashMap<Bytes, StoredValue>,
    key_counter: Arc<AtomicUsize>,
}

impl DbShard {
    /// Creates a new, empty `DbShard`.
    pub(super) fn new() -> Self {
        let key_count = Arc::new(AtomicUsize::new(0));
        Self {
            entries: Mutex::new(ShardCache::new(key_count.clone())),
            key_count,
        }
    }
}

impl ShardCache {
    fn new(key_counter: Arc<AtomicUsize>) -> Self {
        Self {
            store: HashMap::new(),
            key_counter,
        }
    }

    /// Puts a key-value pair into the cache, returning the old value if the
    /// key already existed.
    pub fn put(&mut self, key: Bytes, value: StoredValue) -> Option<StoredValue> {
        let old_value = self.store.insert(key, value);
        if old_value.is_none() {
            self.key_counter.fetch_add(1, Ordering::Relaxed);
        }
        old_value
    }

    /// Removes a key from the cache, returning the value if the key was present.
    /// Removing an absent key is a no-op, so expiry paths stay idempotent.
    pub fn pop(&mut self, key: &Bytes) -> Option<StoredValue> {
        let popped = self.store.remove(key);
        if popped.is_some() {
            self.key_counter.fetch_sub(1, Ordering::Relaxed);
        }
        popped
    }

    /// Gets a mutable reference to a value, inserting a default if it doesn't exist.
    pub fn get_or_insert_with_mut<F>(&mut self, key: Bytes, f: F) -> &mut StoredValue
    where
        F: FnOnce() -> StoredValue,
    {
        if !self.store.contains_key(&key) {
            self.key_counter.fetch_add(1, Ordering::Relaxed);
        }
        self.store.entry(key).or_insert_with(f)
    }

    /// Gets a mutable reference to a value.
    pub fn get_mut(&mut self, key: &Bytes) -> Option<&mut StoredValue> {
        self.store.get_mut(key)
    }

    /// Gets an immutable reference to a value.
    pub fn peek(&self, key: &Bytes) -> Option<&StoredValue> {
        self.store.get(key)
    }
}
