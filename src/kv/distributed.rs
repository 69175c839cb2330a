//! Cluster-wide KV view over per-node local stores
//!
//! Toyota Way Principles:
//! - Heijunka (Load Leveling): new keys are spread over nodes by hash
//!
//! Architecture:
//! - Every node keeps its own [`MemoryKvStore`]
//! - A directory maps each key to the node currently storing it
//! - Reads and removes route through the directory; a key lives on exactly
//!   one node at a time
//! - The directory is a hint: a miss or a stale entry falls back to asking
//!   every node, and the entry is repaired

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHasher;

use super::{KvStore, MemoryKvStore};
use crate::cluster::NodeId;
use crate::key::Key;
use crate::value::Value;
use crate::{Error, Result};

/// Distributed key-value store spanning every attached node.
#[derive(Debug, Default)]
pub struct DistributedKv {
    nodes: DashMap<NodeId, Arc<MemoryKvStore>>,
    directory: DashMap<Key, NodeId>,
}

impl DistributedKv {
    /// Create a store with no nodes attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `node`, returning its local store.
    ///
    /// Attaching an already attached node returns its existing store.
    pub fn attach(&self, node: NodeId) -> Arc<MemoryKvStore> {
        Arc::clone(
            self.nodes
                .entry(node)
                .or_insert_with(|| Arc::new(MemoryKvStore::new()))
                .value(),
        )
    }

    /// Detach `node`, discarding everything it stored.
    ///
    /// Returns the detached local store, if the node was attached.
    pub fn detach(&self, node: &NodeId) -> Option<Arc<MemoryKvStore>> {
        let (_, store) = self.nodes.remove(node)?;
        self.directory.retain(|_, owner| *owner != *node);
        Some(store)
    }

    /// Attached nodes, sorted by id.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.nodes.iter().map(|entry| entry.key().clone()).collect();
        nodes.sort();
        nodes
    }

    /// Local store of `node`, if attached.
    #[must_use]
    pub fn node_store(&self, node: &NodeId) -> Option<Arc<MemoryKvStore>> {
        self.nodes.get(node).map(|entry| Arc::clone(entry.value()))
    }

    /// Node currently storing `key`.
    #[must_use]
    pub fn locate(&self, key: &Key) -> Option<NodeId> {
        self.directory.get(key).map(|entry| entry.value().clone())
    }

    /// Node a new `key` is placed on, by hashing over the sorted node list.
    #[must_use]
    pub fn home_node(&self, key: &Key) -> Option<NodeId> {
        let mut nodes = self.nodes();
        if nodes.is_empty() {
            return None;
        }

        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let hash = hasher.finish();

        #[allow(clippy::cast_possible_truncation)]
        let index = (hash % nodes.len() as u64) as usize;
        Some(nodes.swap_remove(index))
    }

    /// Store `value` under `key` on `node`, moving the key there if it
    /// lived elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeUnavailable`] if `node` is not attached.
    pub async fn put_on(&self, node: &NodeId, key: Key, value: Value) -> Result<()> {
        let store = self
            .node_store(node)
            .ok_or_else(|| Error::NodeUnavailable(node.clone()))?;

        let previous = self.directory.insert(key.clone(), node.clone());
        if let Some(previous) = previous.filter(|previous| previous != node) {
            if let Some(old) = self.node_store(&previous) {
                old.remove(&key).await?;
            }
        }
        store.put(key, value).await
    }

    /// Move `key` to `node`.
    ///
    /// Returns `false` if the key is not stored anywhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeUnavailable`] if `node` is not attached.
    pub async fn migrate(&self, key: &Key, node: &NodeId) -> Result<bool> {
        let Some(value) = self.get(key).await? else {
            return Ok(false);
        };
        self.put_on(node, key.clone(), value).await?;
        Ok(true)
    }

    /// Total number of keys across all nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|entry| entry.value().len()).sum()
    }

    /// Check if no node stores anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|entry| entry.value().is_empty())
    }

    /// Find the node storing `key`, repairing the directory on the way.
    fn owner(&self, key: &Key) -> Option<(NodeId, Arc<MemoryKvStore>)> {
        if let Some(node) = self.locate(key) {
            match self.node_store(&node) {
                Some(store) if store.contains_key(key) => return Some((node, store)),
                _ => {
                    self.directory.remove_if(key, |_, owner| *owner == node);
                }
            }
        }

        let node = self
            .nodes()
            .into_iter()
            .find(|node| self.node_store(node).is_some_and(|store| store.contains_key(key)))?;
        let store = self.node_store(&node)?;
        self.directory.insert(key.clone(), node.clone());
        Some((node, store))
    }
}

impl KvStore for DistributedKv {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        match self.owner(key) {
            Some((_, store)) => store.get(key).await,
            None => Ok(None),
        }
    }

    async fn put(&self, key: Key, value: Value) -> Result<()> {
        let node = match self.owner(&key) {
            Some((node, _)) => node,
            None => self
                .home_node(&key)
                .ok_or_else(|| Error::InvalidInput("no nodes attached".to_string()))?,
        };
        self.put_on(&node, key, value).await
    }

    async fn remove(&self, key: &Key) -> Result<Option<Value>> {
        let Some((node, store)) = self.owner(key) else {
            return Ok(None);
        };
        self.directory.remove_if(key, |_, owner| *owner == node);
        store.remove(key).await
    }

    async fn contains(&self, key: &Key) -> Result<bool> {
        Ok(self.owner(key).is_some())
    }
}
