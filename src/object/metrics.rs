//! Model Metrics - scoring results of a model on a frame

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Keyed;
use crate::key::Key;

/// Model Metrics hold the scores of one model on one frame.
///
/// Metrics are owned by the model that produced them: removing the model
/// with cascade removes its metrics as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetrics {
    key: Key,
    model: Key,
    frame: Option<Key>,
    values: BTreeMap<String, f64>,
    created_at: DateTime<Utc>,
}

impl ModelMetrics {
    /// Create empty metrics for `model`.
    #[must_use]
    pub fn new(key: impl Into<Key>, model: impl Into<Key>) -> Self {
        Self {
            key: key.into(),
            model: model.into(),
            frame: None,
            values: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Create a builder for metrics with optional fields.
    #[must_use]
    pub fn builder(key: impl Into<Key>, model: impl Into<Key>) -> ModelMetricsBuilder {
        ModelMetricsBuilder::new(key, model)
    }

    /// Key of the model that was scored.
    #[must_use]
    pub const fn model(&self) -> &Key {
        &self.model
    }

    /// Key of the frame the model was scored on, if recorded.
    #[must_use]
    pub const fn frame(&self) -> Option<&Key> {
        self.frame.as_ref()
    }

    /// Look up a named score (e.g. "auc", "rmse").
    #[must_use]
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// All scores, ordered by name.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Keyed for ModelMetrics {
    fn key(&self) -> &Key {
        &self.key
    }
}

/// Builder for `ModelMetrics`.
#[derive(Debug)]
pub struct ModelMetricsBuilder {
    metrics: ModelMetrics,
}

impl ModelMetricsBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(key: impl Into<Key>, model: impl Into<Key>) -> Self {
        Self {
            metrics: ModelMetrics::new(key, model),
        }
    }

    /// Set the scored frame.
    #[must_use]
    pub fn frame(mut self, frame: impl Into<Key>) -> Self {
        self.metrics.frame = Some(frame.into());
        self
    }

    /// Record a named score.
    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.values.insert(name.into(), value);
        self
    }

    /// Set a custom creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.metrics.created_at = created_at;
        self
    }

    /// Build the `ModelMetrics`.
    #[must_use]
    pub fn build(self) -> ModelMetrics {
        self.metrics
    }
}
