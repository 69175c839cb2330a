//! Node sweep
//!
//! Toyota Way Principles:
//! - Heijunka (Load Leveling): one key in flight at a time keeps the
//!   per-node delete working set bounded
//! - Jidoka: the retention set is the single oracle for what survives
//!
//! A sweep walks a snapshot of the node's local keys. Pinned keys and chunk
//! keys are skipped without a lookup. Models are removed with cascade;
//! frames are removed through [`Frame::retain`](crate::Frame::retain) so
//! Vecs shared with pinned frames survive. Other kinds are left alone.
//! Each key's deletions complete before the next key is looked at.
//!
//! The top-level key is always taken out of the node's own state; only
//! removals that actually happened are counted. Owned children are removed
//! through the cluster-wide store since they may live on other nodes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, Instrument};

use crate::cluster::NodeId;
use crate::futures::Futures;
use crate::key::Key;
use crate::kv::{resolve, KvStore, MemoryKvStore};
use crate::object;
use crate::retention::RetentionSet;
use crate::value::Value;
use crate::Result;

/// Work unit shipped to every node: sweep against this retention set.
///
/// Immutable once built; the payload is shared, never copied per node
/// until it is encoded for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSweepTask {
    retained: Arc<[Key]>,
    dry_run: bool,
}

#[derive(Serialize)]
struct WireTaskRef<'a> {
    retained: &'a [Key],
    dry_run: bool,
}

#[derive(Deserialize)]
struct WireTask {
    retained: Vec<Key>,
    dry_run: bool,
}

impl NodeSweepTask {
    /// Create a work unit from a finished retention set.
    #[must_use]
    pub fn new(retained: &RetentionSet, dry_run: bool) -> Self {
        Self {
            retained: retained.to_payload(),
            dry_run,
        }
    }

    /// Pinned keys, sorted.
    #[must_use]
    pub fn retained(&self) -> &[Key] {
        &self.retained
    }

    /// Check if this is a dry run.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Encode for transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payload`](crate::Error::Payload) if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let wire = WireTaskRef {
            retained: &self.retained,
            dry_run: self.dry_run,
        };
        Ok(serde_json::to_vec(&wire)?)
    }

    /// Decode a work unit received from the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Payload`](crate::Error::Payload) if `bytes` is not
    /// an encoded work unit.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let wire: WireTask = serde_json::from_slice(bytes)?;
        Ok(Self {
            retained: wire.retained.into(),
            dry_run: wire.dry_run,
        })
    }

    /// Run this work unit on `node`.
    ///
    /// `local` is the node's own state; `store` is the cluster-wide store
    /// cascading deletes are routed through.
    ///
    /// # Errors
    ///
    /// Returns the first error from the store or a deletion.
    pub async fn run<S>(&self, node: &NodeId, local: &MemoryKvStore, store: Arc<S>) -> Result<SweepReport>
    where
        S: KvStore + 'static,
    {
        let retained = RetentionSet::from_payload(&self.retained);
        let span = info_span!("node_sweep", node = %node, dry_run = self.dry_run);
        sweep_node(node, local, store, &retained, self.dry_run)
            .instrument(span)
            .await
    }
}

/// Result of one node's sweep.
///
/// In a dry run the removal counters describe what would have been removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Node the sweep ran on.
    pub node: NodeId,
    /// Whether deletions were skipped.
    pub dry_run: bool,
    /// Keys in the local snapshot.
    pub scanned: u64,
    /// Models removed with cascade.
    pub models_removed: u64,
    /// Frames removed.
    pub frames_removed: u64,
    /// Unpinned Vecs removed along with their frames.
    pub vecs_removed: u64,
    /// Keys skipped because they are pinned.
    pub retained_skipped: u64,
    /// Chunk keys skipped.
    pub chunks_skipped: u64,
    /// Keys that no longer resolved locally.
    pub missing_skipped: u64,
    /// Keys of kinds the sweep does not delete.
    pub unhandled_skipped: u64,
    /// Keys a dry run would have deleted, in snapshot order.
    pub planned: Vec<Key>,
    /// When the sweep started.
    pub started_at: DateTime<Utc>,
    /// When the sweep finished.
    pub finished_at: DateTime<Utc>,
}

impl SweepReport {
    fn new(node: NodeId, dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            node,
            dry_run,
            scanned: 0,
            models_removed: 0,
            frames_removed: 0,
            vecs_removed: 0,
            retained_skipped: 0,
            chunks_skipped: 0,
            missing_skipped: 0,
            unhandled_skipped: 0,
            planned: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Models and frames removed (or planned for removal).
    #[must_use]
    pub const fn removed(&self) -> u64 {
        self.models_removed + self.frames_removed
    }
}

/// Sweep the local state of `node` against `retained`.
///
/// # Errors
///
/// Returns the first error from the store or a deletion; keys handled
/// before the failure stay deleted.
pub async fn sweep_node<S>(
    node: &NodeId,
    local: &MemoryKvStore,
    store: Arc<S>,
    retained: &RetentionSet,
    dry_run: bool,
) -> Result<SweepReport>
where
    S: KvStore + 'static,
{
    let mut report = SweepReport::new(node.clone(), dry_run);
    let snapshot = local.key_set();
    let mut futures = Futures::new();

    for key in snapshot {
        report.scanned += 1;

        if retained.contains(&key) {
            report.retained_skipped += 1;
            continue;
        }
        if key.is_chunk_key() {
            report.chunks_skipped += 1;
            continue;
        }

        let Some(value) = resolve(local, &key).await? else {
            debug!(key = %key, "key no longer resolves locally");
            report.missing_skipped += 1;
            continue;
        };

        match value {
            Value::Model(_) => {
                if dry_run {
                    report.models_removed += 1;
                    report.planned.push(key);
                    continue;
                }
                let Some(removed) = local.remove_if(&key, Value::is_model) else {
                    debug!(key = %key, "model removed concurrently");
                    report.missing_skipped += 1;
                    continue;
                };
                debug!(key = %key, "removing model");
                report.models_removed += 1;
                object::remove_owned(&store, &removed, &mut futures);
            }
            Value::Frame(frame) => {
                if dry_run {
                    report.frames_removed += 1;
                    report.vecs_removed += unpinned_vecs(frame.keys(), retained);
                    report.planned.push(key);
                    continue;
                }
                let Some(Value::Frame(frame)) = local.remove_if(&key, Value::is_frame) else {
                    debug!(key = %key, "frame removed concurrently");
                    report.missing_skipped += 1;
                    continue;
                };
                debug!(key = %key, "removing frame");
                report.frames_removed += 1;
                let scheduled = frame.retain(&store, &mut futures, retained);
                report.vecs_removed += scheduled as u64;
            }
            other => {
                debug!(key = %key, kind = %other.kind(), "leaving unhandled kind");
                report.unhandled_skipped += 1;
                continue;
            }
        }

        futures.block_for_pending().await?;
    }

    report.finished_at = Utc::now();
    info!(
        node = %node,
        scanned = report.scanned,
        models_removed = report.models_removed,
        frames_removed = report.frames_removed,
        vecs_removed = report.vecs_removed,
        retained_skipped = report.retained_skipped,
        dry_run,
        "node sweep completed"
    );
    Ok(report)
}

fn unpinned_vecs(vecs: &[Key], retained: &RetentionSet) -> u64 {
    vecs.iter().filter(|vec| !retained.contains(vec)).count() as u64
}
