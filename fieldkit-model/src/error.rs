//! Error types for the model layer.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while reading models and configuration.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A reference value did not have the `[model, id]` shape.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}
