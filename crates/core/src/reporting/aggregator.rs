//! Report aggregation
//!
//! Joins reports against users, clients and activities, then shapes the
//! result as a flat list or as per-client / per-user groups with totals.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use timebook_domain::{
    month_range, Activity, Client, ClientGroup, DateRange, EnrichedReport, Report, ReportFilter,
    ReportGroup, ReportOutput, ReportQuery, Result, TimebookError, User, UserGroup,
};
use tracing::{debug, error, instrument};

use super::csv::reports_to_csv;
use super::rates::{client_price_rate, user_hourly_rate, user_travel_rate};
use crate::catalog::ports::{ActivityRepository, ClientRepository};
use crate::tracking::ports::ReportRepository;
use crate::user::ports::UserRepository;

/// Report aggregation service
pub struct ReportAggregator {
    reports: Arc<dyn ReportRepository>,
    users: Arc<dyn UserRepository>,
    clients: Arc<dyn ClientRepository>,
    activities: Arc<dyn ActivityRepository>,
}

/// Entities referenced by a batch of reports, keyed by id
struct References {
    users: HashMap<String, User>,
    clients: HashMap<String, Client>,
    activities: HashMap<String, Activity>,
}

impl ReportAggregator {
    /// Create a new aggregator
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        users: Arc<dyn UserRepository>,
        clients: Arc<dyn ClientRepository>,
        activities: Arc<dyn ActivityRepository>,
    ) -> Self {
        Self { reports, users, clients, activities }
    }

    /// Aggregate the reports matching `query`.
    #[instrument(skip_all, fields(start = %query.range.start, end = %query.range.end))]
    pub async fn aggregate(&self, query: &ReportQuery) -> Result<ReportOutput> {
        let started = Instant::now();
        let (reports, refs) = self.load(query.range, &query.filter).await?;

        let output = match query.group {
            None => ReportOutput::Flat(
                reports.into_iter().map(|r| enrich(r, &refs)).collect::<Result<_>>()?,
            ),
            Some(ReportGroup::Client) => ReportOutput::ByClient(group_by_client(reports, &refs)?),
            Some(ReportGroup::User) => ReportOutput::ByUser(group_by_user(reports, &refs)?),
        };

        debug!(
            group = ?query.group,
            duration_ms = started.elapsed().as_millis() as u64,
            "Aggregated reports"
        );
        Ok(output)
    }

    /// Aggregate one calendar month.
    pub async fn aggregate_month(
        &self,
        month: u32,
        year: i32,
        group: Option<ReportGroup>,
        filter: ReportFilter,
    ) -> Result<ReportOutput> {
        let range = month_range(month, year)?;
        self.aggregate(&ReportQuery { range, group, filter }).await
    }

    /// Render matching reports as CSV, in date order.
    pub async fn export_csv(&self, range: DateRange, filter: &ReportFilter) -> Result<String> {
        let (reports, refs) = self.load(range, filter).await?;
        let enriched = reports.into_iter().map(|r| enrich(r, &refs)).collect::<Result<Vec<_>>>()?;
        Ok(reports_to_csv(&enriched))
    }

    async fn load(
        &self,
        range: DateRange,
        filter: &ReportFilter,
    ) -> Result<(Vec<Report>, References)> {
        filter.validate()?;
        let mut reports = self.reports.find_in_range(range, filter).await?;
        // Stable, so adapters' secondary ordering survives.
        reports.sort_by_key(|r| r.date);

        let user_ids = distinct(&reports, |r| &r.user_id);
        let client_ids = distinct(&reports, |r| &r.client_id);
        let activity_ids = distinct(&reports, |r| &r.activity_id);

        let (users, clients, activities) = tokio::try_join!(
            self.users.find_by_ids(&user_ids),
            self.clients.find_by_ids(&client_ids),
            self.activities.find_by_ids(&activity_ids),
        )?;

        let refs = References {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            clients: clients.into_iter().map(|c| (c.id.clone(), c)).collect(),
            activities: activities.into_iter().map(|a| (a.id.clone(), a)).collect(),
        };

        debug!(
            reports = reports.len(),
            users = refs.users.len(),
            clients = refs.clients.len(),
            activities = refs.activities.len(),
            "Loaded reports and references"
        );
        Ok((reports, refs))
    }
}

fn distinct(reports: &[Report], key: impl Fn(&Report) -> &String) -> Vec<String> {
    reports.iter().map(key).cloned().collect::<BTreeSet<_>>().into_iter().collect()
}

fn missing(report: &Report, kind: &str, id: &str) -> TimebookError {
    error!(report_id = %report.id, kind, id, "Report references a missing entity");
    TimebookError::Integrity(format!("report {} references missing {kind} {id}", report.id))
}

fn user_of<'a>(report: &Report, refs: &'a References) -> Result<&'a User> {
    refs.users.get(&report.user_id).ok_or_else(|| missing(report, "user", &report.user_id))
}

fn client_of<'a>(report: &Report, refs: &'a References) -> Result<&'a Client> {
    refs.clients.get(&report.client_id).ok_or_else(|| missing(report, "client", &report.client_id))
}

fn activity_of<'a>(report: &Report, refs: &'a References) -> Result<&'a Activity> {
    refs.activities
        .get(&report.activity_id)
        .ok_or_else(|| missing(report, "activity", &report.activity_id))
}

fn enrich(report: Report, refs: &References) -> Result<EnrichedReport> {
    let username = user_of(&report, refs)?.display_name();
    let client_name = client_of(&report, refs)?.display_name().to_string();
    let activity_name = activity_of(&report, refs)?.display_name().to_string();
    Ok(EnrichedReport { report, client_name, username, activity_name })
}

fn group_by_client(
    reports: Vec<Report>,
    refs: &References,
) -> Result<BTreeMap<String, ClientGroup>> {
    let mut groups: BTreeMap<String, ClientGroup> = BTreeMap::new();

    for report in reports {
        let client = client_of(&report, refs)?;
        let price = client_price_rate(client, activity_of(&report, refs)?) * report.duration;
        let hours = report.duration;
        let enriched = enrich(report, refs)?;

        let group = groups.entry(client.id.clone()).or_insert_with(|| ClientGroup {
            client_id: client.id.clone(),
            client_name: client.display_name().to_string(),
            reports: Vec::new(),
            total_hours: 0.0,
            total_price: 0.0,
        });
        group.total_hours += hours;
        group.total_price += price;
        group.reports.push(enriched);
    }

    Ok(groups)
}

fn group_by_user(reports: Vec<Report>, refs: &References) -> Result<BTreeMap<String, UserGroup>> {
    let mut groups: BTreeMap<String, UserGroup> = BTreeMap::new();
    // Highest travel rate seen per user and workday.
    let mut travel: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();

    for report in reports {
        let user = user_of(&report, refs)?;
        let pay = user_hourly_rate(user, &report) * report.duration;
        let travel_rate = user_travel_rate(user, &report);
        let hours = report.duration;
        let date = report.date;
        let enriched = enrich(report, refs)?;

        let day = travel.entry(user.id.clone()).or_default().entry(date).or_insert(travel_rate);
        *day = day.max(travel_rate);

        let group = groups.entry(user.id.clone()).or_insert_with(|| UserGroup {
            user_id: user.id.clone(),
            username: user.display_name(),
            reports: Vec::new(),
            total_hours: 0.0,
            salary: 0.0,
            travel_salary: 0.0,
            number_of_workdays: 0,
            total_salary: 0.0,
        });
        group.total_hours += hours;
        group.salary += pay;
        group.reports.push(enriched);
    }

    for (user_id, group) in &mut groups {
        if let Some(days) = travel.get(user_id) {
            group.number_of_workdays = days.len();
            group.travel_salary = days.values().sum();
        }
        group.total_salary = group.salary + group.travel_salary;
    }

    Ok(groups)
}
