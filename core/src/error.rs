//! Error types for loading app definitions.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors that can occur while loading an app definition.
#[derive(Debug, Error)]
pub enum AppError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The definition parsed but is structurally invalid.
    #[error("invalid app definition: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
