//! Error types for configuration files.

use std::io;

/// Errors that can occur while loading, saving or querying a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading from or writing to the underlying stream failed.
    #[error("config I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The document is not valid YAML or does not have the expected shape.
    #[error("invalid config document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No target with this name exists.
    #[error("{0} target not found")]
    TargetNotFound(String),
}

impl ConfigError {
    /// Create a target-not-found error.
    pub fn target_not_found(name: impl Into<String>) -> Self {
        Self::TargetNotFound(name.into())
    }

    /// Returns true if this error reports a missing target.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::TargetNotFound(_))
    }
}
