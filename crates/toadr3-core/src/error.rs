//! Error types for record validation and duration parsing

use thiserror::Error;

/// Result type for record operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while validating or constructing domain records
#[derive(Debug, Error)]
pub enum ModelError {
    /// One or more field constraints were violated
    #[error("Invalid record: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A record could not be built from the given inputs
    #[error("{0}")]
    InvalidArgument(String),

    /// JSON did not match the record schema
    #[error("Schema error: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Error returned by the ISO 8601 duration parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Text does not follow the supported duration grammar
    #[error("Invalid ISO 8601 duration: {0}")]
    InvalidDuration(String),
}
