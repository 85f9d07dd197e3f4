//! Catalog service - clients and the activities they are billed for

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use timebook_common::{StringValidator, Validator};
use timebook_domain::{
    archived_value, new_id, Activity, ActivityInput, Client, ClientInput, Result, TimebookError,
};
use tracing::info;

use super::ports::{ActivityRepository, ClientRepository};
use crate::validation::into_domain_error;

/// Manages clients and activities
pub struct CatalogService {
    clients: Arc<dyn ClientRepository>,
    activities: Arc<dyn ActivityRepository>,
}

impl CatalogService {
    /// Create a new catalog service
    pub fn new(clients: Arc<dyn ClientRepository>, activities: Arc<dyn ActivityRepository>) -> Self {
        Self { clients, activities }
    }

    // Clients
    // ------------------------------------------------------------------

    /// Active clients, by name
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.clients.list_active().await
    }

    /// Get a client by id
    pub async fn get_client(&self, id: &str) -> Result<Client> {
        self.clients.find_by_id(id).await?.ok_or_else(|| TimebookError::not_found("Client"))
    }

    /// Create a client
    pub async fn create_client(&self, input: ClientInput) -> Result<Client> {
        self.validate_client(&input).await?;

        let now = Utc::now();
        let client = Client {
            id: new_id(),
            name: input.name.trim().to_string(),
            contact: input.contact,
            activities: input.activities,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        self.clients.create(&client).await?;

        info!(client_id = %client.id, "Client created");
        Ok(client)
    }

    /// Replace a client's details and activity rates
    pub async fn update_client(&self, id: &str, input: ClientInput) -> Result<Client> {
        let mut client = self.active_client(id).await?;
        self.validate_client(&input).await?;

        client.name = input.name.trim().to_string();
        client.contact = input.contact;
        client.activities = input.activities;
        client.updated_at = Utc::now();
        self.clients.update(&client).await?;

        info!(client_id = %client.id, "Client updated");
        Ok(client)
    }

    /// Archive a client, freeing its name
    pub async fn archive_client(&self, id: &str) -> Result<Client> {
        let mut client = self.active_client(id).await?;

        client.name = archived_value(&client.name, &client.id);
        client.archived = true;
        client.updated_at = Utc::now();
        self.clients.update(&client).await?;

        info!(client_id = %client.id, "Client archived");
        Ok(client)
    }

    async fn active_client(&self, id: &str) -> Result<Client> {
        match self.clients.find_by_id(id).await? {
            Some(client) if !client.archived => Ok(client),
            _ => Err(TimebookError::not_found("Client")),
        }
    }

    async fn validate_client(&self, input: &ClientInput) -> Result<()> {
        let ids: Vec<String> = input.activities.iter().map(|a| a.activity_id.clone()).collect();
        let known = if ids.is_empty() { Vec::new() } else { self.activities.find_by_ids(&ids).await? };

        let mut v = Validator::new();
        v.validate_not_empty("name", &input.name);
        if let Some(email) = input.contact.email.as_deref().filter(|e| !e.trim().is_empty()) {
            v.validate_nested("contact", |v| {
                v.validate_field("email", email, &StringValidator::email());
            });
        }

        let mut seen = BTreeSet::new();
        v.validate_nested("activities", |v| {
            for (i, rate) in input.activities.iter().enumerate() {
                v.validate_nested(&i.to_string(), |v| {
                    if !known.iter().any(|a| a.id == rate.activity_id && !a.archived) {
                        v.add_error("activityId", "does not exist");
                    } else if !seen.insert(rate.activity_id.as_str()) {
                        v.add_error("activityId", "is listed twice");
                    }
                    v.validate_optional_min("hourlyRate", rate.hourly_rate, 0.0);
                });
            }
        });
        v.finalize().map_err(into_domain_error)
    }

    // Activities
    // ------------------------------------------------------------------

    /// Active activities, by name
    pub async fn list_activities(&self) -> Result<Vec<Activity>> {
        self.activities.list_active().await
    }

    /// Get an activity by id
    pub async fn get_activity(&self, id: &str) -> Result<Activity> {
        self.activities.find_by_id(id).await?.ok_or_else(|| TimebookError::not_found("Activity"))
    }

    /// Create an activity
    pub async fn create_activity(&self, input: ActivityInput) -> Result<Activity> {
        validate_activity(&input)?;

        let now = Utc::now();
        let activity = Activity {
            id: new_id(),
            name: input.name.trim().to_string(),
            hourly_rate: input.hourly_rate,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        self.activities.create(&activity).await?;

        info!(activity_id = %activity.id, "Activity created");
        Ok(activity)
    }

    /// Replace an activity's name and default rate
    pub async fn update_activity(&self, id: &str, input: ActivityInput) -> Result<Activity> {
        let mut activity = self.active_activity(id).await?;
        validate_activity(&input)?;

        activity.name = input.name.trim().to_string();
        activity.hourly_rate = input.hourly_rate;
        activity.updated_at = Utc::now();
        self.activities.update(&activity).await?;

        info!(activity_id = %activity.id, "Activity updated");
        Ok(activity)
    }

    /// Archive an activity, freeing its name
    pub async fn archive_activity(&self, id: &str) -> Result<Activity> {
        let mut activity = self.active_activity(id).await?;

        activity.name = archived_value(&activity.name, &activity.id);
        activity.archived = true;
        activity.updated_at = Utc::now();
        self.activities.update(&activity).await?;

        info!(activity_id = %activity.id, "Activity archived");
        Ok(activity)
    }

    async fn active_activity(&self, id: &str) -> Result<Activity> {
        match self.activities.find_by_id(id).await? {
            Some(activity) if !activity.archived => Ok(activity),
            _ => Err(TimebookError::not_found("Activity")),
        }
    }
}

fn validate_activity(input: &ActivityInput) -> Result<()> {
    let mut v = Validator::new();
    v.validate_not_empty("name", &input.name);
    v.validate_optional_min("hourlyRate", input.hourly_rate, 0.0);
    v.finalize().map_err(into_domain_error)
}
