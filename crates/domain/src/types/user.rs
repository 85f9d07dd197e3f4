//! User types
//!
//! Employees and contractors who log time, plus administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// How a user is engaged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentType {
    #[default]
    Employee,
    Contractor,
}

impl_domain_status_conversions!(EmploymentType {
    Employee => "employee",
    Contractor => "contractor",
});

/// Per-(client, activity) rate override for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRate {
    pub client_id: String,
    pub activity_id: String,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    #[serde(default)]
    pub travel_rate: Option<f64>,
}

/// Stored user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Human-friendly display number, allocated sequentially
    pub number: i64,
    pub username: String,
    pub email: String,
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub employment_type: EmploymentType,
    pub hourly_rate: Option<f64>,
    pub travel_rate: Option<f64>,
    /// Last day of a month on which the previous month is still editable
    pub last_report_day: u32,
    pub rates: Vec<UserRate>,
    pub archived: bool,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// `"First Last"`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Override for the given client and activity, if any.
    pub fn rate_for(&self, client_id: &str, activity_id: &str) -> Option<&UserRate> {
        self.rates.iter().find(|r| r.client_id == client_id && r.activity_id == activity_id)
    }
}

/// Create/update payload for a user
///
/// `password` is required on create and optional on update, where it resets
/// the password.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub is_admin: bool,
    pub employment_type: EmploymentType,
    pub hourly_rate: Option<f64>,
    pub travel_rate: Option<f64>,
    pub last_report_day: u32,
    pub rates: Vec<UserRate>,
}
