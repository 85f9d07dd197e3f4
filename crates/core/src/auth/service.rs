//! Authentication service

use std::sync::Arc;

use serde::Serialize;
use timebook_domain::{Result, TimebookError, User};
use tracing::{debug, info, warn};

use super::ports::{IssuedToken, PasswordHashing, TokenIssuer};
use crate::user::ports::UserRepository;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: User,
}

/// Checks credentials and resolves tokens back to users
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordHashing>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordHashing>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self { users, passwords, tokens }
    }

    /// Exchange credentials for an access token.
    ///
    /// Unknown users, archived users and wrong passwords all fail the same
    /// way.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            debug!("Login rejected: unknown username");
            return Err(TimebookError::Auth(INVALID_CREDENTIALS.into()));
        };

        if !self.passwords.verify(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(TimebookError::Auth(INVALID_CREDENTIALS.into()));
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, is_admin = user.is_admin, "User logged in");
        Ok(LoginResponse { token, user })
    }

    /// Resolve a bearer token to the current state of its user.
    ///
    /// The user is reloaded on every call, so archiving or demoting someone
    /// takes effect on their next request.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let claims = self.tokens.verify(token)?;

        match self.users.find_by_id(&claims.sub).await? {
            Some(user) if !user.archived => Ok(user),
            _ => {
                debug!(user_id = %claims.sub, "Token names a missing or archived user");
                Err(TimebookError::Auth("User no longer exists".into()))
            }
        }
    }
}
