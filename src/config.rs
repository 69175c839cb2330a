//! Retain configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How far root expansion follows cross-validation children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpansionMode {
    /// Pin cross-validation children without expanding them (default).
    ///
    /// The children survive, but their own frames and metrics are swept
    /// unless named as roots.
    #[default]
    Bounded,
    /// Expand cross-validation children like user roots, transitively.
    Recursive,
}

/// Configuration of a retain call.
///
/// # Example
///
/// ```rust
/// use trueno_dkv::{ExpansionMode, RetainConfig};
///
/// // Use defaults
/// let config = RetainConfig::default();
/// assert_eq!(config.expansion, ExpansionMode::Bounded);
///
/// // Or customize
/// let config = RetainConfig::builder()
///     .expansion(ExpansionMode::Recursive)
///     .dry_run(true)
///     .build();
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetainConfig {
    /// Cross-validation expansion mode.
    pub expansion: ExpansionMode,

    /// Classify keys and report what would be deleted, without deleting.
    pub dry_run: bool,
}

impl RetainConfig {
    /// Create a config builder
    #[must_use]
    pub fn builder() -> RetainConfigBuilder {
        RetainConfigBuilder::default()
    }

    /// Parse a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the document is not a valid config.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("retain config: {e}")))
    }
}

/// Retain config builder
#[derive(Debug, Default)]
pub struct RetainConfigBuilder {
    config: RetainConfig,
}

impl RetainConfigBuilder {
    /// Set cross-validation expansion mode
    #[must_use]
    pub const fn expansion(mut self, expansion: ExpansionMode) -> Self {
        self.config.expansion = expansion;
        self
    }

    /// Enable or disable dry-run sweeps
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Build the config
    #[must_use]
    pub const fn build(self) -> RetainConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_bounded_and_destructive() {
        let config = RetainConfig::default();
        assert_eq!(config.expansion, ExpansionMode::Bounded);
        assert!(!config.dry_run);
        assert_eq!(RetainConfig::builder().build(), config);
    }

    #[test]
    fn test_from_json_partial() {
        let config = RetainConfig::from_json(r#"{"dryRun": true}"#).unwrap();
        assert!(config.dry_run);
        assert_eq!(config.expansion, ExpansionMode::Bounded);

        let config = RetainConfig::from_json(r#"{"expansion": "recursive"}"#).unwrap();
        assert_eq!(config.expansion, ExpansionMode::Recursive);
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let result = RetainConfig::from_json(r#"{"expansion": "everything"}"#);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
