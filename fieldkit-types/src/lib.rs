//! Core type definitions for fieldkit.
//!
//! This crate defines the small, schema-agnostic vocabulary shared by the
//! rest of the workspace:
//! - Element identifiers for list/set/map entries (UUID v7)
//! - Schema-relative [`KeyPath`]s and container-aware [`ValuePath`]s
//! - The query [`Expression`] DSL that field values are encoded into
//!
//! Anything that knows about a concrete schema shape belongs in
//! `fieldkit-model` or `fieldkit-fields`, not here.

mod expression;
mod ids;
mod path;

pub use expression::Expression;
pub use ids::ElementId;
pub use path::{KeyPath, KeySegment, ValuePath, ValuePathSegment};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid key path: {0}")]
    InvalidKeyPath(String),
}
