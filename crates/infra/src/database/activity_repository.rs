//! Activity repository implementation using SQLite

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Row};
use timebook_core::ActivityRepository;
use timebook_domain::{Activity, Result as DomainResult, TimebookError};
use tokio::task;
use tracing::instrument;

use super::manager::DbManager;
use super::sql::{bool_to_int, from_millis, int_to_bool, query_by_ids, to_millis};
use crate::errors::{map_join_error, map_storage_error};

const ACTIVITY_COLUMNS: &str = "id, name, hourly_rate, archived, created_at, updated_at";

/// SQLite-backed implementation of `ActivityRepository`
pub struct SqliteActivityRepository {
    db: Arc<DbManager>,
}

impl SqliteActivityRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ActivityRepository for SqliteActivityRepository {
    #[instrument(level = "debug", skip(self))]
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Activity>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<Activity>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                &format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ?1"),
                &[&id],
                map_activity_row,
            );

            match result {
                Ok(activity) => Ok(Some(activity)),
                Err(err) if err.is_no_rows() => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Activity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        task::spawn_blocking(move || -> DomainResult<Vec<Activity>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id IN ({{ids}})");
            query_by_ids(&conn, &sql, &ids, map_activity_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_active(&self) -> DomainResult<Vec<Activity>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Activity>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE archived = 0 ORDER BY name COLLATE NOCASE"
            );
            conn.prepare(&sql)
                .and_then(|mut stmt| stmt.query_map(&[], map_activity_row))
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, activity), fields(activity_id = %activity.id))]
    async fn create(&self, activity: &Activity) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let activity = activity.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO activities (id, name, hourly_rate, archived, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    activity.id,
                    activity.name,
                    activity.hourly_rate,
                    bool_to_int(activity.archived),
                    to_millis(&activity.created_at),
                    to_millis(&activity.updated_at),
                ],
            )
            .map_err(map_storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, activity), fields(activity_id = %activity.id))]
    async fn update(&self, activity: &Activity) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let activity = activity.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE activities SET name = ?1, hourly_rate = ?2, archived = ?3, updated_at = ?4
                     WHERE id = ?5",
                    params![
                        activity.name,
                        activity.hourly_rate,
                        bool_to_int(activity.archived),
                        to_millis(&activity.updated_at),
                        activity.id, // WHERE clause
                    ],
                )
                .map_err(map_storage_error)?;

            if changed == 0 {
                return Err(TimebookError::not_found("Activity"));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_activity_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id: row.get(0)?,
        name: row.get(1)?,
        hourly_rate: row.get(2)?,
        archived: int_to_bool(row.get(3)?),
        created_at: from_millis(4, row.get(4)?)?,
        updated_at: from_millis(5, row.get(5)?)?,
    })
}
