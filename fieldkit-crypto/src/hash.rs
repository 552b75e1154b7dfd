//! Password hashing.
//!
//! Uses Argon2id and emits self-describing PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so verification needs no
//! out-of-band parameters.

use crate::error::{CryptoError, CryptoResult};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Size of salt in bytes.
pub const SALT_SIZE: usize = 16;

/// A plaintext password that is wiped from memory when dropped.
pub type SecretString = Zeroizing<String>;

/// Salt for password hashing.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }

    /// Encodes the salt as unpadded standard base64, the alphabet PHC
    /// strings use.
    pub fn to_b64(&self) -> String {
        STANDARD_NO_PAD.encode(self.bytes)
    }

    /// Decodes a salt produced by [`Salt::to_b64`].
    pub fn from_b64(encoded: &str) -> CryptoResult<Self> {
        let decoded = STANDARD_NO_PAD
            .decode(encoded)
            .map_err(|e| CryptoError::InvalidSalt(e.to_string()))?;
        let bytes: [u8; SALT_SIZE] = decoded.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidSalt(format!(
                "expected {SALT_SIZE} bytes, got {}",
                decoded.len()
            ))
        })?;
        Ok(Self { bytes })
    }
}

/// Argon2 cost parameters.
///
/// Default values are tuned for a balance of security and performance
/// on modern hardware.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Time cost (iterations).
    pub time_cost: u32,
    /// Parallelism factor.
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        // OWASP recommendations for Argon2id (2023)
        Self {
            memory_cost: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashParams {
    /// Parameters for testing (fast but insecure).
    pub fn test() -> Self {
        Self {
            memory_cost: 1024, // 1 MiB
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Hashes `password` with Argon2id and returns the PHC string.
pub fn hash_password(password: &str, salt: &Salt, params: &HashParams) -> CryptoResult<String> {
    let argon2_params = Params::new(params.memory_cost, params.time_cost, params.parallelism, None)
        .map_err(|e| CryptoError::Hashing(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let salt_string =
        SaltString::encode_b64(salt.as_bytes()).map_err(|e| CryptoError::InvalidSalt(e.to_string()))?;

    let hash = argon2
        .hash_password(password.as_bytes(), &salt_string)
        .map_err(|e| CryptoError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks `password` against a PHC string produced by [`hash_password`].
pub fn verify_password(password: &str, hash: &str) -> CryptoResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| CryptoError::InvalidHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
