//! Error types for provider configuration.

use resource_schema_core::FieldValidationError;
use thiserror::Error;

/// Errors that can occur while loading or validating provider configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The configured namespace is not a valid path.
    #[error("invalid namespace: {0}")]
    InvalidNamespace(#[from] FieldValidationError),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
