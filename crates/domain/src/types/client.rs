//! Client types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact details for a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientContact {
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Activity offered to a client, optionally at a client-specific price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientActivityRate {
    pub activity_id: String,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}

/// Stored client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub contact: ClientContact,
    pub activities: Vec<ClientActivityRate>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Name as entered, without the archive suffix.
    pub fn display_name(&self) -> &str {
        super::unarchived_value(&self.name)
    }

    /// Client-specific price for an activity, if set.
    pub fn rate_for(&self, activity_id: &str) -> Option<f64> {
        self.activities.iter().find(|a| a.activity_id == activity_id).and_then(|a| a.hourly_rate)
    }
}

/// Create/update payload for a client
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInput {
    pub name: String,
    pub contact: ClientContact,
    pub activities: Vec<ClientActivityRate>,
}
