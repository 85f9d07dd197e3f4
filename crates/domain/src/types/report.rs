//! Time-tracking report types
//!
//! A report is one block of work a user did for a client on a calendar
//! date. The date carries no time of day, so "same workday" is plain date
//! equality.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::calendar::deserialize_calendar_date;

/// Stored time-tracking report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub user_id: String,
    pub client_id: String,
    pub activity_id: String,
    pub date: NaiveDate,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
    /// Hours, never negative
    pub duration: f64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a report
///
/// `user_id` is only honoured for administrators; everyone else always
/// logs time for themselves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[serde(default)]
    pub user_id: Option<String>,
    pub client_id: String,
    pub activity_id: String,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub duration: f64,
    #[serde(default)]
    pub notes: String,
}
