//! Port interfaces for clients and activities

use async_trait::async_trait;
use timebook_domain::{Activity, Client, Result};

/// Persistence for clients
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Get a client by id, archived or not
    async fn find_by_id(&self, id: &str) -> Result<Option<Client>>;

    /// Get several clients in one lookup; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Client>>;

    /// All active clients, ordered by name
    async fn list_active(&self) -> Result<Vec<Client>>;

    /// Insert a client with its activity rates
    async fn create(&self, client: &Client) -> Result<()>;

    /// Overwrite a stored client, activity rates included
    async fn update(&self, client: &Client) -> Result<()>;
}

/// Persistence for activities
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Get an activity by id, archived or not
    async fn find_by_id(&self, id: &str) -> Result<Option<Activity>>;

    /// Get several activities in one lookup; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Activity>>;

    /// All active activities, ordered by name
    async fn list_active(&self) -> Result<Vec<Activity>>;

    /// Insert an activity
    async fn create(&self, activity: &Activity) -> Result<()>;

    /// Overwrite a stored activity
    async fn update(&self, activity: &Activity) -> Result<()>;
}
