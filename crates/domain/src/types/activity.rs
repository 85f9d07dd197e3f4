//! Activity types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Billable kind of work, with its default price per hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub hourly_rate: Option<f64>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    /// Name as entered, without the archive suffix.
    pub fn display_name(&self) -> &str {
        super::unarchived_value(&self.name)
    }
}

/// Create/update payload for an activity
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityInput {
    pub name: String,
    pub hourly_rate: Option<f64>,
}
