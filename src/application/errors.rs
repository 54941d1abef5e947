//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// Plugin discovery and loading errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Failed to instantiate plugin '{factory}' from {path}: {reason}")]
    Instantiate {
        path: PathBuf,
        factory: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PluginError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

pub type PluginResult<T> = Result<T, PluginError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
