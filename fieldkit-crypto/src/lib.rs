//! Password hashing for fieldkit.
//!
//! Password fields never store plaintext: on save the plaintext is hashed
//! with Argon2id and only the resulting PHC string is persisted. This crate
//! provides the hashing primitives; running them off the caller's task is
//! the job of the worker in `fieldkit-fields`.

mod error;
mod hash;

pub use error::{CryptoError, CryptoResult};
pub use hash::{hash_password, verify_password, HashParams, Salt, SecretString, SALT_SIZE};
