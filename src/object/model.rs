//! Model - trained artifact with parameter and output blocks

use serde::{Deserialize, Serialize};

use super::Keyed;
use crate::key::Key;

/// Training parameters that reference input frames.
///
/// The frames are referenced, not owned: removing the model leaves them
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Training frame.
    pub train: Option<Key>,
    /// Validation frame.
    pub valid: Option<Key>,
}

/// Output block produced by training.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOutput {
    /// Scoring metrics produced for this model.
    pub model_metrics: Vec<Key>,
    /// Child models built during cross-validation.
    pub cross_validation_models: Vec<Key>,
}

/// Model represents a trained artifact.
///
/// A model owns its metrics and its cross-validation children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    key: Key,
    algorithm: String,
    params: ModelParameters,
    output: Option<ModelOutput>,
}

impl Model {
    /// Create a model with no frames and no output.
    #[must_use]
    pub fn new(key: impl Into<Key>, algorithm: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            algorithm: algorithm.into(),
            params: ModelParameters::default(),
            output: None,
        }
    }

    /// Create a builder for constructing a model with optional fields.
    #[must_use]
    pub fn builder(key: impl Into<Key>, algorithm: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(key, algorithm)
    }

    /// Get the algorithm name (e.g., "glm", "gbm").
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Training parameters.
    #[must_use]
    pub const fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// Output block, if training produced one.
    #[must_use]
    pub const fn output(&self) -> Option<&ModelOutput> {
        self.output.as_ref()
    }
}

impl Keyed for Model {
    fn key(&self) -> &Key {
        &self.key
    }

    fn owned_keys(&self) -> Vec<Key> {
        self.output.as_ref().map_or_else(Vec::new, |output| {
            output
                .model_metrics
                .iter()
                .chain(&output.cross_validation_models)
                .cloned()
                .collect()
        })
    }
}

/// Builder for `Model`.
#[derive(Debug)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(key: impl Into<Key>, algorithm: impl Into<String>) -> Self {
        Self {
            model: Model::new(key, algorithm),
        }
    }

    /// Set the training frame.
    #[must_use]
    pub fn train(mut self, frame: impl Into<Key>) -> Self {
        self.model.params.train = Some(frame.into());
        self
    }

    /// Set the validation frame.
    #[must_use]
    pub fn valid(mut self, frame: impl Into<Key>) -> Self {
        self.model.params.valid = Some(frame.into());
        self
    }

    /// Add a metrics key to the output block.
    #[must_use]
    pub fn metric(mut self, metrics: impl Into<Key>) -> Self {
        self.output_mut().model_metrics.push(metrics.into());
        self
    }

    /// Add a cross-validation child model to the output block.
    #[must_use]
    pub fn cross_validation_model(mut self, model: impl Into<Key>) -> Self {
        self.output_mut().cross_validation_models.push(model.into());
        self
    }

    /// Set an empty output block (training finished without metrics).
    #[must_use]
    pub fn empty_output(mut self) -> Self {
        self.output_mut();
        self
    }

    fn output_mut(&mut self) -> &mut ModelOutput {
        self.model.output.get_or_insert_with(ModelOutput::default)
    }

    /// Build the `Model`.
    #[must_use]
    pub fn build(self) -> Model {
        self.model
    }
}
