//! Domain types and models
//!
//! Directory entities (users, clients, activities), time-tracking reports
//! and the shapes produced by report aggregation. Everything serializes as
//! camelCase JSON.

pub mod activity;
pub mod aggregate;
pub mod client;
pub mod report;
pub mod user;

pub use activity::{Activity, ActivityInput};
pub use aggregate::{
    ClientGroup, EnrichedReport, ReportFilter, ReportGroup, ReportOutput, ReportQuery, UserGroup,
};
pub use client::{Client, ClientActivityRate, ClientContact, ClientInput};
pub use report::{Report, ReportInput};
pub use user::{EmploymentType, User, UserInput, UserRate};

use crate::constants::ARCHIVE_MARKER;

/// Value stored in a unique column once its owner is archived.
///
/// Ids are unique, so the result cannot collide with a live value or with
/// another archived one.
pub fn archived_value(value: &str, id: &str) -> String {
    format!("{value}{ARCHIVE_MARKER}{id}")
}

/// Original value of a column rewritten by [`archived_value`].
///
/// Values without the marker are returned unchanged.
pub fn unarchived_value(value: &str) -> &str {
    value.split_once(ARCHIVE_MARKER).map_or(value, |(original, _)| original)
}

/// Generate a new entity id (UUID v7, time ordered).
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
