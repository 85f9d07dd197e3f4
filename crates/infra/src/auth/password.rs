//! Argon2id implementation of `PasswordHashing`

use async_trait::async_trait;
use timebook_common::{PasswordError, PasswordHasher};
use timebook_core::PasswordHashing;
use timebook_domain::{Result as DomainResult, TimebookError};
use tokio::task;

use crate::errors::map_join_error;

/// Hashes on the blocking pool so request workers stay responsive.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher {
    inner: PasswordHasher,
}

impl Argon2PasswordHasher {
    /// Create a hasher with default Argon2id parameters
    pub fn new() -> Self {
        Self { inner: PasswordHasher::new() }
    }
}

#[async_trait]
impl PasswordHashing for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> DomainResult<String> {
        let hasher = self.inner;
        let password = password.to_string();

        task::spawn_blocking(move || hasher.hash(&password).map_err(map_password_error))
            .await
            .map_err(map_join_error)?
    }

    async fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        let hasher = self.inner;
        let password = password.to_string();
        let hash = hash.to_string();

        task::spawn_blocking(move || hasher.verify(&password, &hash).map_err(map_password_error))
            .await
            .map_err(map_join_error)?
    }
}

fn map_password_error(err: PasswordError) -> TimebookError {
    TimebookError::Internal(err.to_string())
}
