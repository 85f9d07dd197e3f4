//! Report aggregation inputs and outputs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::report::Report;
use crate::constants::MAX_FILTER_IDS;
use crate::errors::{Result, TimebookError};
use crate::impl_domain_status_conversions;
use crate::utils::calendar::DateRange;

/// Grouping key for aggregated reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportGroup {
    Client,
    User,
}

impl_domain_status_conversions!(ReportGroup {
    Client => "client",
    User => "user",
});

/// Optional restrictions on the referenced entities
///
/// An empty list places no restriction on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportFilter {
    pub users: Vec<String>,
    pub clients: Vec<String>,
    pub activities: Vec<String>,
}

impl ReportFilter {
    /// Whether a report passes every non-empty axis.
    pub fn matches(&self, report: &Report) -> bool {
        fn allows(set: &[String], id: &str) -> bool {
            set.is_empty() || set.iter().any(|s| s == id)
        }

        allows(&self.users, &report.user_id)
            && allows(&self.clients, &report.client_id)
            && allows(&self.activities, &report.activity_id)
    }

    /// Reject axes listing more than [`MAX_FILTER_IDS`] ids.
    pub fn validate(&self) -> Result<()> {
        for (axis, ids) in
            [("users", &self.users), ("clients", &self.clients), ("activities", &self.activities)]
        {
            if ids.len() > MAX_FILTER_IDS {
                return Err(TimebookError::field(
                    format!("filter[{axis}]"),
                    format!("must not list more than {MAX_FILTER_IDS} ids"),
                ));
            }
        }
        Ok(())
    }
}

/// A complete aggregation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub range: DateRange,
    pub group: Option<ReportGroup>,
    pub filter: ReportFilter,
}

/// Report joined with the names of what it references
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedReport {
    #[serde(flatten)]
    pub report: Report,
    pub client_name: String,
    /// Display name of the user
    pub username: String,
    pub activity_name: String,
}

/// Reports of one client with billing totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientGroup {
    pub client_id: String,
    pub client_name: String,
    pub reports: Vec<EnrichedReport>,
    pub total_hours: f64,
    pub total_price: f64,
}

/// Reports of one user with payroll totals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub user_id: String,
    pub username: String,
    pub reports: Vec<EnrichedReport>,
    pub total_hours: f64,
    pub salary: f64,
    /// One travel allowance per workday, at that day's highest rate
    pub travel_salary: f64,
    pub number_of_workdays: usize,
    pub total_salary: f64,
}

/// Aggregation result, shaped by the requested grouping
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportOutput {
    Flat(Vec<EnrichedReport>),
    ByClient(BTreeMap<String, ClientGroup>),
    ByUser(BTreeMap<String, UserGroup>),
}

impl ReportOutput {
    /// Every report in the output, in group then date order.
    pub fn reports(&self) -> Vec<&EnrichedReport> {
        match self {
            Self::Flat(reports) => reports.iter().collect(),
            Self::ByClient(groups) => groups.values().flat_map(|g| g.reports.iter()).collect(),
            Self::ByUser(groups) => groups.values().flat_map(|g| g.reports.iter()).collect(),
        }
    }
}
