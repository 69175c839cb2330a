//! Cluster membership and work-unit transport
//!
//! The retention sweep programs against the [`Cluster`] trait: a membership
//! snapshot, a cluster-wide store and a "run this work unit on node N"
//! primitive whose delivery is reported through a [`CompletionHandle`].
//! [`LocalCluster`] is the in-process implementation.

mod local;

pub use local::LocalCluster;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::kv::KvStore;
use crate::retain::{NodeSweepTask, SweepReport};
use crate::{Error, Result};

/// Identifier of a cluster member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A cluster the retention sweep can run on.
pub trait Cluster: Send + Sync {
    /// Cluster-wide store used to resolve roots and route deletes.
    type Store: KvStore + 'static;

    /// Cluster-wide store.
    fn store(&self) -> Arc<Self::Store>;

    /// Snapshot of the current members.
    fn members(&self) -> Vec<NodeId>;

    /// Ship `task` to `node` and start it there.
    ///
    /// Must not block; the outcome is reported through the returned handle.
    fn run_on_node(&self, node: &NodeId, task: &NodeSweepTask) -> CompletionHandle;
}

/// Completion handle of a work unit submitted to one node.
#[derive(Debug)]
pub struct CompletionHandle {
    node: NodeId,
    inner: JoinHandle<Result<SweepReport>>,
}

impl CompletionHandle {
    /// Wrap the task running the work unit for `node`.
    #[must_use]
    pub fn new(node: NodeId, inner: JoinHandle<Result<SweepReport>>) -> Self {
        Self { node, inner }
    }

    /// Node the work unit was submitted to.
    #[must_use]
    pub const fn node(&self) -> &NodeId {
        &self.node
    }

    /// Wait for the work unit to finish.
    ///
    /// A panicked or aborted task is reported as a failure of its node.
    pub async fn wait(self) -> NodeOutcome {
        let Self { node, inner } = self;
        let result = match inner.await {
            Ok(result) => result,
            Err(e) => Err(Error::NodeTaskFailed {
                node: node.clone(),
                reason: e.to_string(),
            }),
        };
        match result {
            Ok(report) => NodeOutcome::Completed(report),
            Err(e) => NodeOutcome::Failed {
                node,
                error: e.to_string(),
            },
        }
    }
}

/// Final status of one node's work unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeOutcome {
    /// The sweep ran to completion.
    Completed(SweepReport),
    /// The sweep failed; the node's post-sweep state is undefined.
    Failed {
        /// Node the work unit was submitted to.
        node: NodeId,
        /// Failure description.
        error: String,
    },
}

impl NodeOutcome {
    /// Node this outcome belongs to.
    #[must_use]
    pub const fn node(&self) -> &NodeId {
        match self {
            Self::Completed(report) => &report.node,
            Self::Failed { node, .. } => node,
        }
    }

    /// Check if the sweep completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Sweep report, if the sweep completed.
    #[must_use]
    pub const fn report(&self) -> Option<&SweepReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }
}
