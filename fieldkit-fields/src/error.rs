//! Error types for the field engine.
//!
//! Schema problems never show up here: construction degrades to an error
//! leaf instead. These errors cover encoding values that must not be
//! persisted and failures of the external collaborators used by save and
//! delete hooks.

use fieldkit_crypto::CryptoError;
use thiserror::Error;

/// Result type for field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur while encoding values or running hooks.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The value failed its field's validation and must not be persisted.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The value's data does not have the shape the field expects.
    #[error("value mismatch: expected {expected} data, got {actual}")]
    ValueMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A save or delete collaborator failed.
    #[error("context error: {0}")]
    Context(#[from] ContextError),

    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for worker and session calls.
pub type ContextResult<T> = Result<T, ContextError>;

/// Errors reported by the worker and session collaborators.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The hashing worker failed.
    #[error("worker error: {0}")]
    Worker(String),

    /// A session request failed.
    #[error("session error: {0}")]
    Session(String),

    /// The requested record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The session does not provide this capability.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Hashing primitive error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
