//! In-memory KV store implementation using `DashMap`.
//!
//! Each cluster node keeps its local state in one of these. Data is lost
//! on process restart.

use super::KvStore;
use crate::key::Key;
use crate::value::Value;
use crate::Result;
use dashmap::DashMap;

/// In-memory key-value store using lock-free concurrent hashmap.
///
/// Thread-safe and optimized for high-concurrency read/write workloads.
/// Uses `DashMap` internally for O(1) average-case operations.
///
/// # Example
///
/// ```rust
/// use trueno_dkv::kv::{KvStore, MemoryKvStore};
/// use trueno_dkv::{Frame, Key};
///
/// # async fn example() -> trueno_dkv::Result<()> {
/// let store = MemoryKvStore::new();
/// store.put(Key::new("f1"), Frame::new("f1", vec![]).into()).await?;
/// assert_eq!(store.key_set(), vec![Key::new("f1")]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryKvStore {
    store: DashMap<Key, Value>,
}

impl MemoryKvStore {
    /// Create a new in-memory KV store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Snapshot of the keys currently stored.
    ///
    /// Keys added or removed after the call are not reflected.
    #[must_use]
    pub fn key_set(&self) -> Vec<Key> {
        self.store.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Check if `key` is stored here, without going through the async API.
    #[must_use]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.store.contains_key(key)
    }

    /// Remove `key` only if its current value satisfies `predicate`.
    ///
    /// The check and the removal are atomic with respect to other writers.
    pub fn remove_if(&self, key: &Key, predicate: impl FnOnce(&Value) -> bool) -> Option<Value> {
        self.store
            .remove_if(key, |_, value| predicate(value))
            .map(|(_, value)| value)
    }

    /// Get the number of entries in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryKvStore {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(self.store.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: Key, value: Value) -> Result<()> {
        self.store.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: &Key) -> Result<Option<Value>> {
        Ok(self.store.remove(key).map(|(_, value)| value))
    }

    async fn contains(&self, key: &Key) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }
}
