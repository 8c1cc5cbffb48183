//! Engine Configuration - interpretation thresholds and content strictness
//!
//! Configuration is plain data loaded from RON. Every field has a default, so
//! a config file only needs to name what it changes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for an [`Engine`](crate::Engine)
///
/// # Example
///
/// ```
/// use mishap_engine::EngineConfig;
///
/// let config = EngineConfig::from_ron_str("(avoidable_threshold: 0.75)").unwrap();
/// assert_eq!(config.avoidable_threshold, 0.75);
/// assert!(!config.strict_content);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Blame weight at or above which a non-fortunate outcome reads as avoidable
    ///
    /// Must lie in `[0, 1]`.
    pub avoidable_threshold: f64,

    /// Prefix for seeds the engine generates when a caller supplies none
    pub default_seed_prefix: String,

    /// Treat any rejected content definition as a fatal load error
    pub strict_content: bool,
}

impl EngineConfig {
    /// Parse and validate a RON document
    pub fn from_ron_str(text: &str) -> Result<Self> {
        let config: EngineConfig =
            ron::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.avoidable_threshold) {
            return Err(Error::Config(format!(
                "avoidable_threshold must be within [0, 1], got {}",
                self.avoidable_threshold
            )));
        }
        if self.default_seed_prefix.is_empty() {
            return Err(Error::Config(
                "default_seed_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            avoidable_threshold: 0.5,
            default_seed_prefix: "auto".to_string(),
            strict_content: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.avoidable_threshold, 0.5);
        assert_eq!(config.default_seed_prefix, "auto");
        assert!(!config.strict_content);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = EngineConfig::from_ron_str("(strict_content: true)").unwrap();
        assert!(config.strict_content);
        assert_eq!(config.avoidable_threshold, 0.5);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err = EngineConfig::from_ron_str("(avoidable_threshold: 1.5)").unwrap_err();
        assert_eq!(err.kind().code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.ron");
        fs::write(&path, "(default_seed_prefix: \"replay\")").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.default_seed_prefix, "replay");

        assert!(EngineConfig::load(dir.path().join("missing.ron")).is_err());
    }
}
