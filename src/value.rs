//! Stored values and their kinds
//!
//! A [`Value`] is what a [`Key`](crate::key::Key) resolves to. Its kind can
//! be inspected without touching the payload, and the materialization
//! accessors hand out the shared domain object.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::key::Key;
use crate::object::{Chunk, Frame, Keyed, Model, ModelMetrics, VecColumn};

/// Kind of a stored value.
///
/// Every kind has a stable numeric code, reported in
/// [`Error::InvalidRetentionKind`](crate::Error::InvalidRetentionKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Deleted value still occupying its key.
    Tombstone,
    /// Tabular dataset.
    Frame,
    /// Trained model.
    Model,
    /// Scoring metrics of a model.
    ModelMetrics,
    /// Column of a frame.
    Vec,
    /// Storage block of a Vec.
    Chunk,
    /// Raw bytes with no known structure.
    Blob,
}

impl ValueKind {
    /// Stable numeric kind code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Tombstone => 0,
            Self::Frame => 10,
            Self::Model => 20,
            Self::ModelMetrics => 21,
            Self::Vec => 30,
            Self::Chunk => 31,
            Self::Blob => 40,
        }
    }

    /// Get kind name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tombstone => "tombstone",
            Self::Frame => "frame",
            Self::Model => "model",
            Self::ModelMetrics => "model_metrics",
            Self::Vec => "vec",
            Self::Chunk => "chunk",
            Self::Blob => "blob",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held by the key/value store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Tabular dataset.
    Frame(Arc<Frame>),
    /// Trained model.
    Model(Arc<Model>),
    /// Model scoring metrics.
    ModelMetrics(Arc<ModelMetrics>),
    /// Frame column.
    Vec(Arc<VecColumn>),
    /// Vec storage block.
    Chunk(Arc<Chunk>),
    /// Opaque bytes.
    Blob(Arc<[u8]>),
    /// Deleted marker.
    Tombstone,
}

impl Value {
    /// Kind of this value, without materializing it.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Frame(_) => ValueKind::Frame,
            Self::Model(_) => ValueKind::Model,
            Self::ModelMetrics(_) => ValueKind::ModelMetrics,
            Self::Vec(_) => ValueKind::Vec,
            Self::Chunk(_) => ValueKind::Chunk,
            Self::Blob(_) => ValueKind::Blob,
            Self::Tombstone => ValueKind::Tombstone,
        }
    }

    /// Check if this value is a tombstone.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Tombstone)
    }

    /// Check if this value is a frame.
    #[must_use]
    pub const fn is_frame(&self) -> bool {
        matches!(self, Self::Frame(_))
    }

    /// Check if this value is a model.
    #[must_use]
    pub const fn is_model(&self) -> bool {
        matches!(self, Self::Model(_))
    }

    /// Materialize as a frame.
    #[must_use]
    pub const fn as_frame(&self) -> Option<&Arc<Frame>> {
        match self {
            Self::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    /// Materialize as a model.
    #[must_use]
    pub const fn as_model(&self) -> Option<&Arc<Model>> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Keys removed together with this value by a cascading remove.
    #[must_use]
    pub fn owned_keys(&self) -> Vec<Key> {
        match self {
            Self::Frame(frame) => frame.owned_keys(),
            Self::Model(model) => model.owned_keys(),
            Self::ModelMetrics(metrics) => metrics.owned_keys(),
            Self::Vec(vec) => vec.owned_keys(),
            Self::Chunk(chunk) => chunk.owned_keys(),
            Self::Blob(_) | Self::Tombstone => Vec::new(),
        }
    }
}

impl From<Frame> for Value {
    fn from(frame: Frame) -> Self {
        Self::Frame(Arc::new(frame))
    }
}

impl From<Model> for Value {
    fn from(model: Model) -> Self {
        Self::Model(Arc::new(model))
    }
}

impl From<ModelMetrics> for Value {
    fn from(metrics: ModelMetrics) -> Self {
        Self::ModelMetrics(Arc::new(metrics))
    }
}

impl From<VecColumn> for Value {
    fn from(vec: VecColumn) -> Self {
        Self::Vec(Arc::new(vec))
    }
}

impl From<Chunk> for Value {
    fn from(chunk: Chunk) -> Self {
        Self::Chunk(Arc::new(chunk))
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Blob(bytes.into())
    }
}
