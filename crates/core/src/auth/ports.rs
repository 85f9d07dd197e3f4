//! Port interfaces for authentication

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timebook_domain::{Result, User};

/// Password hashing
///
/// Hashing is slow on purpose; implementations keep it off the async
/// executor.
#[async_trait]
pub trait PasswordHashing: Send + Sync {
    /// Hash a plaintext password for storage
    async fn hash(&self, password: &str) -> Result<String>;

    /// Check a plaintext password against a stored hash
    async fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    /// Admin flag at issue time
    pub adm: bool,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Signed access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for `user`
    fn issue(&self, user: &User) -> Result<IssuedToken>;

    /// Verify signature and expiry, returning the claims.
    ///
    /// Any failure is an `Auth` error.
    fn verify(&self, token: &str) -> Result<TokenClaims>;
}
