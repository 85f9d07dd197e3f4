//! Port interfaces for the user directory

use async_trait::async_trait;
use timebook_domain::{Result, User};

/// Persistence for users
///
/// Lookups by id also return archived users so historical reports keep
/// resolving. Listing and login lookups only see active users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by id, archived or not
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Get several users in one lookup; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>>;

    /// Get an active user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// All active users, ordered by display number
    async fn list_active(&self) -> Result<Vec<User>>;

    /// Number of stored users, archived included
    async fn count(&self) -> Result<i64>;

    /// Insert a user, allocating its display number.
    ///
    /// Returns the stored user. Fails with `Duplicate` when a unique field
    /// is taken.
    async fn create(&self, user: User) -> Result<User>;

    /// Overwrite a stored user, rate overrides included
    async fn update(&self, user: &User) -> Result<()>;
}
