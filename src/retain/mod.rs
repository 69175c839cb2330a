//! Cluster-wide selective retention
//!
//! ## Pipeline
//!
//! ```text
//! roots ──> expand_roots ──> RetentionSet ──> ClusterDispatcher
//!                                                  │ (one NodeSweepTask per member)
//!                                   ┌──────────────┼──────────────┐
//!                                   v              v              v
//!                              sweep node-0   sweep node-1   sweep node-2
//! ```
//!
//! Expansion runs on the coordinator and fails before anything is
//! dispatched if a root is neither a frame nor a model. Node sweeps run in
//! parallel across nodes and strictly one key at a time within a node.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use trueno_dkv::cluster::LocalCluster;
//! use trueno_dkv::kv::KvStore;
//! use trueno_dkv::{Frame, Key, Retainer};
//!
//! # async fn example() -> trueno_dkv::Result<()> {
//! let cluster = Arc::new(LocalCluster::with_nodes(2));
//! let kv = cluster.kv();
//! kv.put(Key::new("keep"), Frame::new("keep", vec![]).into()).await?;
//! kv.put(Key::new("drop"), Frame::new("drop", vec![]).into()).await?;
//!
//! let report = Retainer::new(cluster.clone()).retain(&[Key::new("keep")]).await?;
//! assert!(report.all_succeeded());
//! assert_eq!(cluster.all_keys(), vec![Key::new("keep")]);
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod expand;
mod sweep;

pub use dispatch::ClusterDispatcher;
pub use expand::expand_roots;
pub use sweep::{sweep_node, NodeSweepTask, SweepReport};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cluster::{Cluster, NodeId, NodeOutcome};
use crate::config::RetainConfig;
use crate::key::Key;
use crate::retention::RetentionSet;
use crate::Result;

/// Coordinator of retain calls on one cluster.
pub struct Retainer<C: Cluster> {
    cluster: Arc<C>,
    config: RetainConfig,
}

impl<C: Cluster> Retainer<C> {
    /// Create a retainer with the default config.
    #[must_use]
    pub fn new(cluster: Arc<C>) -> Self {
        Self::with_config(cluster, RetainConfig::default())
    }

    /// Create a retainer with `config`.
    #[must_use]
    pub fn with_config(cluster: Arc<C>, config: RetainConfig) -> Self {
        Self { cluster, config }
    }

    /// Active config.
    #[must_use]
    pub const fn config(&self) -> &RetainConfig {
        &self.config
    }

    /// Expand `roots` without sweeping anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRetentionKind`](crate::Error::InvalidRetentionKind)
    /// if a root is neither a frame nor a model.
    pub async fn expand(&self, roots: &[Key]) -> Result<RetentionSet> {
        let store = self.cluster.store();
        expand_roots(store.as_ref(), roots, self.config.expansion).await
    }

    /// Delete everything in the cluster that `roots` do not pin.
    ///
    /// Node failures do not fail the call; they are reported per node in
    /// the returned [`RetainReport`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRetentionKind`](crate::Error::InvalidRetentionKind)
    /// if a root is neither a frame nor a model. No node is touched in that
    /// case.
    pub async fn retain(&self, roots: &[Key]) -> Result<RetainReport> {
        let started_at = Utc::now();
        info!(
            roots = roots.len(),
            dry_run = self.config.dry_run,
            "starting retain"
        );

        let retained = self.expand(roots).await?;
        let task = NodeSweepTask::new(&retained, self.config.dry_run);
        let nodes = ClusterDispatcher::new(self.cluster.as_ref())
            .dispatch(&task)
            .await;

        let report = RetainReport {
            retained: retained.len(),
            nodes,
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            retained = report.retained,
            nodes = report.nodes.len(),
            failed = report.failed_nodes().len(),
            models_removed = report.models_removed(),
            frames_removed = report.frames_removed(),
            "retain completed"
        );
        Ok(report)
    }
}

/// Outcome of a retain call across the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainReport {
    /// Size of the retention set.
    pub retained: usize,
    /// Per-node outcomes, in membership order.
    pub nodes: Vec<NodeOutcome>,
    /// When the call started.
    pub started_at: DateTime<Utc>,
    /// When the last node finished.
    pub finished_at: DateTime<Utc>,
}

impl RetainReport {
    /// Check if every node completed its sweep.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.nodes.iter().all(NodeOutcome::is_success)
    }

    /// Nodes whose sweep failed.
    #[must_use]
    pub fn failed_nodes(&self) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|outcome| !outcome.is_success())
            .map(NodeOutcome::node)
            .collect()
    }

    /// Models removed across all completed sweeps.
    #[must_use]
    pub fn models_removed(&self) -> u64 {
        self.reports().map(|report| report.models_removed).sum()
    }

    /// Frames removed across all completed sweeps.
    #[must_use]
    pub fn frames_removed(&self) -> u64 {
        self.reports().map(|report| report.frames_removed).sum()
    }

    /// Keys dry-run sweeps would have deleted, across all nodes.
    #[must_use]
    pub fn planned(&self) -> Vec<&Key> {
        self.reports().flat_map(|report| &report.planned).collect()
    }

    fn reports(&self) -> impl Iterator<Item = &SweepReport> {
        self.nodes.iter().filter_map(NodeOutcome::report)
    }
}

/// Delete everything in `cluster` that `roots` do not pin, with the
/// default config.
///
/// # Errors
///
/// See [`Retainer::retain`].
pub async fn retain<C: Cluster>(cluster: Arc<C>, roots: &[Key]) -> Result<RetainReport> {
    Retainer::new(cluster).retain(roots).await
}
