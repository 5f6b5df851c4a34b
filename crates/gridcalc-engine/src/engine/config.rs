use serde::Deserialize;
use thiserror::Error;

/// Default cap on the number of cells in one evaluation chain.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Hard ceiling for `max_depth`. Evaluation recurses once per level, so
/// deeper chains would exhaust the thread stack instead of failing with
/// `#DEPTH`.
pub const MAX_ALLOWED_DEPTH: usize = 1024;

/// Engine settings that cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_depth must be between 1 and {MAX_ALLOWED_DEPTH}, got {0}")]
    MaxDepthOutOfRange(usize),
}

/// Engine settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of cells resolved in one evaluation chain before the
    /// chain fails with `#DEPTH`.
    pub max_depth: usize,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (1..=MAX_ALLOWED_DEPTH).contains(&self.max_depth) {
            Ok(())
        } else {
            Err(ConfigError::MaxDepthOutOfRange(self.max_depth))
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
