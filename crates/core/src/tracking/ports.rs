//! Port interfaces for time tracking
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use timebook_domain::{DateRange, Report, ReportFilter, Result};

/// Persistence for time-tracking reports
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Get a report by id
    async fn find_by_id(&self, id: &str) -> Result<Option<Report>>;

    /// Reports dated inside `range` that pass `filter`.
    ///
    /// Ordered ascending by date, then by creation time.
    async fn find_in_range(&self, range: DateRange, filter: &ReportFilter) -> Result<Vec<Report>>;

    /// Insert a report
    async fn create(&self, report: &Report) -> Result<()>;

    /// Overwrite a stored report
    async fn update(&self, report: &Report) -> Result<()>;

    /// Delete a report, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool>;
}
