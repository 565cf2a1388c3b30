//! Error types for RPD validation

use thiserror::Error;

/// Result type for validator operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Validator errors
///
/// The path engine only ever raises [`ValidatorError::MalformedExpression`], and only
/// while parsing. Everything else comes from building check definitions or loading
/// schemas, documents and configuration.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Malformed path expression '{expression}': {reason}")]
    MalformedExpression { expression: String, reason: String },

    #[error("Invalid check definition: {0}")]
    InvalidCheck(String),

    #[error("Schema file not found for version {version}: {path}")]
    SchemaNotFound { version: String, path: String },

    #[error("Schema could not be compiled: {0}")]
    SchemaCompile(String),

    #[error("Invalid schema version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl ValidatorError {
    pub(crate) fn malformed(expression: &str, reason: impl Into<String>) -> Self {
        ValidatorError::MalformedExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}
