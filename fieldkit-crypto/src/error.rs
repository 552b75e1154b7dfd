//! Error types for the hashing layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in password hashing.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Hashing failed (bad parameters or internal Argon2 error).
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Salt was not valid unpadded base64 of the expected length.
    #[error("invalid salt: {0}")]
    InvalidSalt(String),

    /// Stored hash was not a valid PHC string.
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
}
