//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`) so the salt and
//! parameters travel with the hash and can be tuned later without a
//! migration.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;
use thiserror::Error;
use tracing::{instrument, warn};

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Argon2id password hasher with the crate's default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a hasher using Argon2id defaults.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password into a PHC string.
    #[instrument(skip_all)]
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Check a plaintext password against a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
    #[instrument(skip_all)]
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            warn!(error = %e, "stored password hash could not be parsed");
            PasswordError::MalformedHash(e.to_string())
        })?;

        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &hash).unwrap());
        assert!(!hasher.verify("battery staple", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = PasswordHasher::new();
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::new();
        assert!(matches!(
            hasher.verify("pw", "not-a-phc-string"),
            Err(PasswordError::MalformedHash(_))
        ));
    }
}
