//! Cluster dispatcher
//!
//! Submits one [`NodeSweepTask`] per current member and collects every
//! node's outcome. Nodes sweep independently; a failure on one node does
//! not stop its siblings and is never retried.

use tracing::{error, info};

use super::NodeSweepTask;
use crate::cluster::{Cluster, CompletionHandle, NodeOutcome};

/// Fans a work unit out to every member of a cluster.
pub struct ClusterDispatcher<'a, C: Cluster> {
    cluster: &'a C,
}

impl<'a, C: Cluster> ClusterDispatcher<'a, C> {
    /// Create a dispatcher for `cluster`.
    #[must_use]
    pub const fn new(cluster: &'a C) -> Self {
        Self { cluster }
    }

    /// Run `task` on every current member and wait for all of them.
    ///
    /// Membership is snapshotted once: nodes joining afterwards are not
    /// swept, departed nodes report a failure. Outcomes are returned in
    /// membership order.
    pub async fn dispatch(&self, task: &NodeSweepTask) -> Vec<NodeOutcome> {
        let members = self.cluster.members();
        info!(
            nodes = members.len(),
            retained = task.retained().len(),
            dry_run = task.is_dry_run(),
            "dispatching node sweeps"
        );

        // Submit everything before waiting so nodes sweep in parallel.
        let handles: Vec<CompletionHandle> = members
            .iter()
            .map(|node| self.cluster.run_on_node(node, task))
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = handle.wait().await;
            if let NodeOutcome::Failed { node, error } = &outcome {
                error!(node = %node, error = %error, "node sweep failed");
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}
