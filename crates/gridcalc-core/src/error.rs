//! Error types for Gridcalc core.

use gridcalc_engine::engine::{ConfigError, StoreError};
use thiserror::Error;

/// Errors that can occur while working with a sheet.
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Could not save cell: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid cell reference: {0}")]
    InvalidCellRef(String),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid engine settings: {0}")]
    Engine(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
