//! Argon2 hashing for directory secrets.
//!
//! Every directory entry stores its own salted Argon2id PHC string; there is
//! no shared secret. Verification reads the cost parameters from the stored
//! hash, so entries hashed with different costs verify side by side.

use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use password_hash::{PasswordHash, SaltString};
use thiserror::Error;

/// Errors raised while producing a hash.
#[derive(Debug, Clone, Error)]
pub enum SecretHashError {
    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("Hashing failed: {0}")]
    HashFailed(String),
}

/// Produces Argon2id hashes with fixed cost parameters.
#[derive(Debug, Clone)]
pub struct SecretHasher {
    params: Params,
}

impl SecretHasher {
    /// Hasher with the library's recommended costs.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Hasher with explicit memory (KiB), iteration and lane costs.
    pub fn with_costs(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, SecretHashError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| SecretHashError::InvalidParams(e.to_string()))?;
        Ok(Self { params })
    }

    /// Minimal-cost hasher for seeded demo accounts and tests.
    ///
    /// Never use this for real accounts.
    pub fn low_cost() -> Self {
        Self::with_costs(Params::MIN_M_COST.max(64), 1, 1).unwrap_or_default()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `secret` with a fresh random salt, returning a PHC string.
    pub fn hash(&self, secret: &str) -> Result<String, SecretHashError> {
        let mut salt_bytes = [0u8; 16];
        getrandom::getrandom(&mut salt_bytes)
            .map_err(|e| SecretHashError::RandomSource(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| SecretHashError::HashFailed(e.to_string()))?;
        let phc = self
            .argon2()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| SecretHashError::HashFailed(e.to_string()))?
            .to_string();
        Ok(phc)
    }
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks `secret` against a stored PHC string.
///
/// An unparseable hash never verifies.
pub fn verify_secret(hash: &str, secret: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
