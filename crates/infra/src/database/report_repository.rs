//! Report repository implementation using SQLite
//!
//! Dates are stored as `YYYY-MM-DD` text, so range and ordering queries
//! compare them lexically.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use timebook_core::ReportRepository;
use timebook_domain::{DateRange, Report, ReportFilter, Result as DomainResult, TimebookError};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::DbManager;
use super::sql::{date_from_sql, date_to_sql, from_millis, placeholders, to_millis};
use crate::errors::{map_join_error, map_storage_error};

const REPORT_COLUMNS: &str = "id, user_id, client_id, activity_id, date, start_time, end_time,
     duration, notes, created_at, updated_at";

/// SQLite-backed implementation of `ReportRepository`
pub struct SqliteReportRepository {
    db: Arc<DbManager>,
}

impl SqliteReportRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReportRepository for SqliteReportRepository {
    #[instrument(level = "debug", skip(self))]
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Report>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Report>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
                &[&id],
                map_report_row,
            );

            match result {
                Ok(report) => Ok(Some(report)),
                Err(err) if err.is_no_rows() => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, filter), fields(start = %range.start, end = %range.end))]
    async fn find_in_range(
        &self,
        range: DateRange,
        filter: &ReportFilter,
    ) -> DomainResult<Vec<Report>> {
        let db = Arc::clone(&self.db);
        let filter = filter.clone();

        task::spawn_blocking(move || -> DomainResult<Vec<Report>> {
            let conn = db.get_connection()?;

            let start = date_to_sql(range.start);
            let end = date_to_sql(range.end);
            let mut sql =
                format!("SELECT {REPORT_COLUMNS} FROM reports WHERE date >= ? AND date < ?");
            let mut params: Vec<&dyn ToSql> = vec![&start, &end];

            for (column, ids) in [
                ("user_id", &filter.users),
                ("client_id", &filter.clients),
                ("activity_id", &filter.activities),
            ] {
                if ids.is_empty() {
                    continue;
                }
                sql.push_str(&format!(" AND {column} IN ({})", placeholders(ids.len())));
                params.extend(ids.iter().map(|id| id as &dyn ToSql));
            }
            sql.push_str(" ORDER BY date, created_at, id");

            let reports = conn
                .prepare(&sql)
                .and_then(|mut stmt| stmt.query_map(&params, map_report_row))
                .map_err(map_storage_error)?;

            debug!(count = reports.len(), "reports loaded");
            Ok(reports)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, report), fields(report_id = %report.id))]
    async fn create(&self, report: &Report) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let report = report.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO reports (
                    id, user_id, client_id, activity_id, date, start_time, end_time,
                    duration, notes, created_at, updated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    report.id,
                    report.user_id,
                    report.client_id,
                    report.activity_id,
                    date_to_sql(report.date),
                    report.start_time,
                    report.end_time,
                    report.duration,
                    report.notes,
                    to_millis(&report.created_at),
                    to_millis(&report.updated_at),
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, report), fields(report_id = %report.id))]
    async fn update(&self, report: &Report) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let report = report.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE reports SET
                        user_id = ?1, client_id = ?2, activity_id = ?3, date = ?4,
                        start_time = ?5, end_time = ?6, duration = ?7, notes = ?8,
                        updated_at = ?9
                     WHERE id = ?10",
                    params![
                        report.user_id,
                        report.client_id,
                        report.activity_id,
                        date_to_sql(report.date),
                        report.start_time,
                        report.end_time,
                        report.duration,
                        report.notes,
                        to_millis(&report.updated_at),
                        report.id, // WHERE clause
                    ],
                )
                .map_err(map_storage_error)?;

            if changed == 0 {
                return Err(TimebookError::not_found("Report"));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let deleted = conn
                .execute("DELETE FROM reports WHERE id = ?1", &[&id])
                .map_err(map_storage_error)?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_report_row(row: &Row<'_>) -> rusqlite::Result<Report> {
    let date: String = row.get(4)?;

    Ok(Report {
        id: row.get(0)?,
        user_id: row.get(1)?,
        client_id: row.get(2)?,
        activity_id: row.get(3)?,
        date: date_from_sql(4, &date)?,
        start_time: row.get(5)?,
        end_time: row.get(6)?,
        duration: row.get(7)?,
        notes: row.get(8)?,
        created_at: from_millis(9, row.get(9)?)?,
        updated_at: from_millis(10, row.get(10)?)?,
    })
}
