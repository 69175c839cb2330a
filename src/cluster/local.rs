//! In-process cluster
//!
//! Every member is a [`MemoryKvStore`] inside one [`DistributedKv`]; work
//! units run as tokio tasks. Work units are serialized before they are
//! started, exactly as they would be for a remote node, so a node only ever
//! sees its own decoded copy of the payload.

use std::sync::Arc;

use dashmap::DashMap;

use super::{Cluster, CompletionHandle, NodeId};
use crate::key::Key;
use crate::kv::{DistributedKv, MemoryKvStore};
use crate::retain::NodeSweepTask;
use crate::Error;

/// Cluster whose members all live in the current process.
///
/// # Example
///
/// ```rust
/// use trueno_dkv::cluster::{Cluster, LocalCluster};
///
/// let cluster = LocalCluster::with_nodes(3);
/// assert_eq!(cluster.members().len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct LocalCluster {
    kv: Arc<DistributedKv>,
    faults: DashMap<NodeId, String>,
}

impl LocalCluster {
    /// Create a cluster with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cluster with members `node-0..node-{n-1}`.
    #[must_use]
    pub fn with_nodes(n: usize) -> Self {
        let cluster = Self::new();
        for i in 0..n {
            cluster.add_node(format!("node-{i}").as_str());
        }
        cluster
    }

    /// Add a member, returning its id.
    pub fn add_node(&self, node: impl Into<NodeId>) -> NodeId {
        let node = node.into();
        self.kv.attach(node.clone());
        tracing::debug!(node = %node, "node joined");
        node
    }

    /// Remove a member; its local state is discarded.
    ///
    /// Returns `false` if `node` was not a member.
    pub fn leave(&self, node: &NodeId) -> bool {
        self.faults.remove(node);
        let left = self.kv.detach(node).is_some();
        if left {
            tracing::debug!(node = %node, "node left");
        }
        left
    }

    /// Make every work unit sent to `node` fail with `reason`, without
    /// touching its state.
    pub fn inject_failure(&self, node: &NodeId, reason: impl Into<String>) {
        self.faults.insert(node.clone(), reason.into());
    }

    /// Undo [`inject_failure`](Self::inject_failure).
    pub fn clear_failure(&self, node: &NodeId) {
        self.faults.remove(node);
    }

    /// Cluster-wide store.
    #[must_use]
    pub const fn kv(&self) -> &Arc<DistributedKv> {
        &self.kv
    }

    /// Local state of `node`, if it is a member.
    #[must_use]
    pub fn node_store(&self, node: &NodeId) -> Option<Arc<MemoryKvStore>> {
        self.kv.node_store(node)
    }

    /// Sorted snapshot of the keys stored on `node`.
    #[must_use]
    pub fn local_keys(&self, node: &NodeId) -> Vec<Key> {
        let mut keys = self
            .node_store(node)
            .map(|store| store.key_set())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Sorted snapshot of every key in the cluster.
    #[must_use]
    pub fn all_keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .kv
            .nodes()
            .iter()
            .flat_map(|node| self.local_keys(node))
            .collect();
        keys.sort();
        keys
    }
}

impl Cluster for LocalCluster {
    type Store = DistributedKv;

    fn store(&self) -> Arc<DistributedKv> {
        Arc::clone(&self.kv)
    }

    fn members(&self) -> Vec<NodeId> {
        self.kv.nodes()
    }

    fn run_on_node(&self, node: &NodeId, task: &NodeSweepTask) -> CompletionHandle {
        let payload = task.encode();
        let local = self.kv.node_store(node);
        let fault = self.faults.get(node).map(|reason| reason.value().clone());
        let kv = Arc::clone(&self.kv);
        let target = node.clone();

        let inner = tokio::spawn(async move {
            let local = local.ok_or_else(|| Error::NodeUnavailable(target.clone()))?;
            if let Some(reason) = fault {
                return Err(Error::NodeTaskFailed {
                    node: target,
                    reason,
                });
            }
            let task = NodeSweepTask::decode(&payload?)?;
            task.run(&target, &local, kv).await
        });

        CompletionHandle::new(node.clone(), inner)
    }
}
