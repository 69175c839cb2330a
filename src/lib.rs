//! # Trueno-DKV: Distributed KV Store with Selective Retention
//!
//! **Version**: 0.1.0 (Phase 1 MVP)
//!
//! Trueno-DKV is an in-memory key/value store spread over the nodes of a
//! data-science cluster. It stores frames (tabular datasets made of Vec
//! columns), models and their metrics, and can garbage-collect the whole
//! cluster down to a chosen set of roots.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Poka-Yoke safety**: Roots are kind-checked before any node is touched
//! - **Heijunka**: Each node deletes one key at a time, bounding in-flight work
//! - **Jidoka**: The retention set is the only oracle for what survives, so
//!   Vecs shared between frames are never lost
//!
//! ## Example Usage (Phase 1 MVP)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trueno_dkv::cluster::LocalCluster;
//! use trueno_dkv::kv::KvStore;
//! use trueno_dkv::{retain, Frame, Key, VecColumn};
//!
//! # async fn example() -> trueno_dkv::Result<()> {
//! let cluster = Arc::new(LocalCluster::with_nodes(3));
//! let kv = cluster.kv();
//!
//! kv.put(Key::new("v1"), VecColumn::new("v1", 4).into()).await?;
//! kv.put(Key::new("train"), Frame::new("train", vec![Key::new("v1")]).into()).await?;
//!
//! // Keep `train` (and its Vec), delete every other frame and model
//! let report = retain(cluster, &[Key::new("train")]).await?;
//! println!("removed {} frames", report.frames_removed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod cluster;
pub mod config;
pub mod error;
pub mod futures;
pub mod key;
pub mod kv;
pub mod object;
pub mod retain;
pub mod retention;
pub mod value;

pub use config::{ExpansionMode, RetainConfig, RetainConfigBuilder};
pub use error::{Error, Result};
pub use key::Key;
pub use object::{Chunk, Frame, Keyed, Model, ModelMetrics, VecColumn};
pub use retain::{retain, RetainReport, Retainer, SweepReport};
pub use retention::RetentionSet;
pub use value::{Value, ValueKind};
