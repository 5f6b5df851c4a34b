//! Configuration loaded from TOML.
//!
//! ```toml
//! read_only = false
//!
//! [engine]
//! max_depth = 256
//! ```

use gridcalc_engine::engine::EngineConfig;
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

/// Settings for opening and recalculating a sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Open sheets without permission to write.
    pub read_only: bool,
    pub engine: EngineConfig,
}

impl Config {
    /// Parse and validate a config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Load a config file. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridcalcError;
    use gridcalc_engine::engine::{ConfigError, DEFAULT_MAX_DEPTH};

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.engine.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str("[engine]\nmax_depth = 8\n").unwrap();
        assert_eq!(config.engine.max_depth, 8);
        assert!(!config.read_only);
    }

    #[test]
    fn test_unknown_key_is_error() {
        let err = Config::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, GridcalcError::Config(_)));
    }

    #[test]
    fn test_depth_above_ceiling_is_error() {
        let err = Config::from_toml_str("[engine]\nmax_depth = 1000000\n").unwrap_err();
        assert!(matches!(
            err,
            GridcalcError::Engine(ConfigError::MaxDepthOutOfRange(1_000_000))
        ));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
