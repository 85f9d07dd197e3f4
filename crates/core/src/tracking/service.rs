//! Time-tracking service - report lifecycle with ownership rules

use std::sync::Arc;

use chrono::Utc;
use timebook_common::{StringValidator, Validator};
use timebook_domain::{month_range, new_id, Report, ReportFilter, ReportInput, Result, TimebookError, User};
use tracing::{debug, info};

use super::edit_window::ensure_editable;
use super::ports::ReportRepository;
use crate::catalog::ports::{ActivityRepository, ClientRepository};
use crate::clock::{Clock, SystemClock};
use crate::user::ports::UserRepository;
use crate::validation::into_domain_error;

/// Time-tracking service
///
/// Non-admins only ever see and change their own reports; a report owned
/// by someone else behaves as if it did not exist.
pub struct TimeTrackingService {
    reports: Arc<dyn ReportRepository>,
    users: Arc<dyn UserRepository>,
    clients: Arc<dyn ClientRepository>,
    activities: Arc<dyn ActivityRepository>,
    clock: Arc<dyn Clock>,
}

impl TimeTrackingService {
    /// Create a new time-tracking service on the system clock
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        users: Arc<dyn UserRepository>,
        clients: Arc<dyn ClientRepository>,
        activities: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self { reports, users, clients, activities, clock: Arc::new(SystemClock) }
    }

    /// Replace the clock used for the edit window
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reports of one month, ascending by date.
    ///
    /// Admins may name another user; everyone else gets their own reports.
    pub async fn list_month(
        &self,
        caller: &User,
        month: u32,
        year: i32,
        user_id: Option<&str>,
    ) -> Result<Vec<Report>> {
        let range = month_range(month, year)?;
        let owner = match user_id {
            Some(id) if caller.is_admin => id.to_string(),
            _ => caller.id.clone(),
        };
        let filter = ReportFilter { users: vec![owner], ..ReportFilter::default() };
        self.reports.find_in_range(range, &filter).await
    }

    /// Log a new report.
    pub async fn create(&self, caller: &User, input: ReportInput) -> Result<Report> {
        validate_input(&input)?;
        let owner = match &input.user_id {
            Some(id) if caller.is_admin => id.clone(),
            _ => caller.id.clone(),
        };
        ensure_editable(caller, input.date, self.clock.today())?;
        self.ensure_references(&owner, &input).await?;

        let now = Utc::now();
        let report = Report {
            id: new_id(),
            user_id: owner,
            client_id: input.client_id,
            activity_id: input.activity_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            duration: input.duration,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };
        self.reports.create(&report).await?;

        info!(report_id = %report.id, user_id = %report.user_id, date = %report.date, "Report created");
        Ok(report)
    }

    /// Replace the contents of an existing report.
    ///
    /// The edit window applies to both the stored and the new date.
    pub async fn update(&self, caller: &User, id: &str, input: ReportInput) -> Result<Report> {
        let existing = self.find_visible(caller, id).await?;
        validate_input(&input)?;

        let today = self.clock.today();
        ensure_editable(caller, existing.date, today)?;
        ensure_editable(caller, input.date, today)?;

        let owner = match &input.user_id {
            Some(user_id) if caller.is_admin => user_id.clone(),
            _ => existing.user_id.clone(),
        };
        self.ensure_references(&owner, &input).await?;

        let report = Report {
            id: existing.id,
            user_id: owner,
            client_id: input.client_id,
            activity_id: input.activity_id,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            duration: input.duration,
            notes: input.notes,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.reports.update(&report).await?;

        info!(report_id = %report.id, user_id = %report.user_id, "Report updated");
        Ok(report)
    }

    /// Delete a report.
    pub async fn delete(&self, caller: &User, id: &str) -> Result<()> {
        let existing = self.find_visible(caller, id).await?;
        ensure_editable(caller, existing.date, self.clock.today())?;

        if !self.reports.delete(&existing.id).await? {
            return Err(TimebookError::not_found("Report"));
        }
        info!(report_id = %existing.id, user_id = %existing.user_id, "Report deleted");
        Ok(())
    }

    async fn find_visible(&self, caller: &User, id: &str) -> Result<Report> {
        match self.reports.find_by_id(id).await? {
            Some(report) if caller.is_admin || report.user_id == caller.id => Ok(report),
            Some(_) => {
                debug!(report_id = id, caller = %caller.id, "Report hidden from non-owner");
                Err(TimebookError::not_found("Report"))
            }
            None => Err(TimebookError::not_found("Report")),
        }
    }

    /// User, client and activity must exist and be active.
    async fn ensure_references(&self, user_id: &str, input: &ReportInput) -> Result<()> {
        let (user, client, activity) = tokio::try_join!(
            self.users.find_by_id(user_id),
            self.clients.find_by_id(&input.client_id),
            self.activities.find_by_id(&input.activity_id),
        )?;

        let mut v = Validator::new();
        if !user.is_some_and(|u| !u.archived) {
            v.add_error("userId", "does not exist");
        }
        if !client.is_some_and(|c| !c.archived) {
            v.add_error("clientId", "does not exist");
        }
        if !activity.is_some_and(|a| !a.archived) {
            v.add_error("activityId", "does not exist");
        }
        v.finalize().map_err(into_domain_error)
    }
}

fn validate_input(input: &ReportInput) -> Result<()> {
    let time = StringValidator::time_of_day();
    let mut v = Validator::new();
    v.validate_not_empty("clientId", &input.client_id);
    v.validate_not_empty("activityId", &input.activity_id);
    v.validate_field("startTime", input.start_time.as_str(), &time);
    v.validate_field("endTime", input.end_time.as_str(), &time);
    v.validate_min("duration", input.duration, 0.0);
    v.finalize().map_err(into_domain_error)
}
