//! Translator configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default edit distance threshold for identifier matching
pub const DEFAULT_DISTANCE_THRESHOLD: usize = 2;

/// Settings of the matching engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Candidates whose edit distance is not strictly below this value never match
    pub distance_threshold: usize,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
        }
    }
}

impl TranslatorConfig {
    /// Create a configuration with the given threshold
    pub fn with_threshold(distance_threshold: usize) -> Result<Self, ConfigError> {
        let config = TranslatorConfig { distance_threshold };
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TranslatorConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.distance_threshold == 0 {
            return Err(ConfigError::InvalidThreshold(self.distance_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_threshold() {
        assert_eq!(TranslatorConfig::default().distance_threshold, 2);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(matches!(
            TranslatorConfig::with_threshold(0),
            Err(ConfigError::InvalidThreshold(0))
        ));
    }

    #[test]
    fn test_from_file_keeps_defaults() {
        let path = env::temp_dir().join("specmine_config_defaults.json");
        std::fs::write(&path, "{}").unwrap();
        let config = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(config, TranslatorConfig::default());

        std::fs::write(&path, r#"{"distance_threshold": 4}"#).unwrap();
        let config = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(config.distance_threshold, 4);
    }

    #[test]
    fn test_from_missing_file() {
        let path = env::temp_dir().join("specmine_config_does_not_exist.json");
        assert!(matches!(
            TranslatorConfig::from_file(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
