//! Key-Value Store Module
//!
//! Provides the typed key-value layer the retention sweep runs against:
//! - [`MemoryKvStore`]: node-local state backed by `DashMap`
//! - [`DistributedKv`]: cluster-wide view routing every key to the node
//!   that stores it
//! - Async-first API so remote backends can slot in
//!
//! # Example
//!
//! ```rust
//! use trueno_dkv::kv::{KvStore, MemoryKvStore};
//! use trueno_dkv::{Key, Value};
//!
//! # async fn example() -> trueno_dkv::Result<()> {
//! let store = MemoryKvStore::new();
//!
//! store.put(Key::new("blob"), Value::from(b"bytes".to_vec())).await?;
//! assert!(store.contains(&Key::new("blob")).await?);
//!
//! store.remove(&Key::new("blob")).await?;
//! assert!(store.get(&Key::new("blob")).await?.is_none());
//! # Ok(())
//! # }
//! ```

mod distributed;
mod memory;

pub use distributed::DistributedKv;
pub use memory::MemoryKvStore;

use crate::key::Key;
use crate::value::Value;
use crate::Result;
use std::future::Future;

/// Typed key-value store.
///
/// Reads are side-effect free. Tombstones are ordinary values at this
/// layer; use [`resolve`] to treat them as absent.
pub trait KvStore: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist.
    fn get(&self, key: &Key) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Store `value` under `key`.
    ///
    /// Overwrites any existing value.
    fn put(&self, key: Key, value: Value) -> impl Future<Output = Result<()>> + Send;

    /// Remove `key`, returning the value it held.
    ///
    /// No-op if the key doesn't exist.
    fn remove(&self, key: &Key) -> impl Future<Output = Result<Option<Value>>> + Send;

    /// Check if a key exists.
    fn contains(&self, key: &Key) -> impl Future<Output = Result<bool>> + Send;
}

/// Resolve `key`, treating tombstones as absent.
///
/// # Errors
///
/// Propagates store errors.
pub async fn resolve<S: KvStore>(store: &S, key: &Key) -> Result<Option<Value>> {
    Ok(store.get(key).await?.filter(|value| !value.is_null()))
}
