//! User repository implementation using SQLite
//!
//! Rate overrides live in the `user_rates` child table and are written
//! together with their user in one transaction.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::types::Type;
use rusqlite::{params, Row, ToSql, Transaction};
use timebook_common::storage::{SqliteConnection, StorageResult};
use timebook_core::UserRepository;
use timebook_domain::{Result as DomainResult, TimebookError, User, UserRate};
use tokio::task;
use tracing::{debug, instrument};

use super::manager::DbManager;
use super::sql::{bool_to_int, from_millis, group_children, int_to_bool, query_by_ids, to_millis};
use crate::errors::{map_join_error, map_storage_error, InfraError};

const USER_COLUMNS: &str = "id, number, username, email, id_number, first_name, last_name, phone,
     is_admin, employment_type, hourly_rate, travel_rate, last_report_day, archived,
     password_hash, created_at, updated_at";

const NUMBER_SEQUENCE: &str = "users.number";

/// SQLite-backed implementation of `UserRepository`
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(level = "debug", skip(self))]
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<User>> {
            let conn = db.get_connection()?;
            let users = select_users(&conn, "WHERE id = ?1", &[&id]).map_err(map_storage_error)?;
            Ok(users.into_iter().next())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, ids), fields(count = ids.len()))]
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        task::spawn_blocking(move || -> DomainResult<Vec<User>> {
            let conn = db.get_connection()?;
            let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id IN ({{ids}})");
            let mut users =
                query_by_ids(&conn, &sql, &ids, map_user_row).map_err(map_storage_error)?;
            attach_rates(&conn, &mut users).map_err(map_storage_error)?;
            Ok(users)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self))]
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let db = Arc::clone(&self.db);
        let username = username.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<User>> {
            let conn = db.get_connection()?;
            let users = select_users(&conn, "WHERE username = ?1 AND archived = 0", &[&username])
                .map_err(map_storage_error)?;
            Ok(users.into_iter().next())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_active(&self) -> DomainResult<Vec<User>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<User>> {
            let conn = db.get_connection()?;
            select_users(&conn, "WHERE archived = 0 ORDER BY number", &[]).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count(&self) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM users", &[], |row| row.get(0))
                .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> DomainResult<User> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<User> {
            let mut user = user;
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_storage_error)?;

            user.number = next_sequence_value(&tx, NUMBER_SEQUENCE).map_err(sql_error)?;
            insert_user(&tx, &user).map_err(sql_error)?;
            replace_rates(&tx, &user).map_err(sql_error)?;
            tx.commit().map_err(sql_error)?;

            debug!(user_id = %user.id, number = user.number, "user inserted");
            Ok(user)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(level = "debug", skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: &User) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let user = user.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let mut conn = db.get_connection()?;
            let tx = conn.transaction().map_err(map_storage_error)?;

            if update_user(&tx, &user).map_err(sql_error)? == 0 {
                return Err(TimebookError::not_found("User"));
            }
            replace_rates(&tx, &user).map_err(sql_error)?;
            tx.commit().map_err(sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn sql_error(err: rusqlite::Error) -> TimebookError {
    InfraError::from(err).into()
}

fn select_users(
    conn: &SqliteConnection,
    clause: &str,
    params: &[&dyn ToSql],
) -> StorageResult<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users {clause}");
    let mut users = conn.prepare(&sql)?.query_map(params, map_user_row)?;
    attach_rates(conn, &mut users)?;
    Ok(users)
}

fn attach_rates(conn: &SqliteConnection, users: &mut [User]) -> StorageResult<()> {
    if users.is_empty() {
        return Ok(());
    }
    let ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
    let rows = query_by_ids(
        conn,
        "SELECT user_id, client_id, activity_id, hourly_rate, travel_rate
         FROM user_rates WHERE user_id IN ({ids}) ORDER BY user_id, position",
        &ids,
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                UserRate {
                    client_id: row.get(1)?,
                    activity_id: row.get(2)?,
                    hourly_rate: row.get(3)?,
                    travel_rate: row.get(4)?,
                },
            ))
        },
    )?;

    let mut grouped = group_children(rows);
    for user in users.iter_mut() {
        user.rates = grouped.remove(&user.id).unwrap_or_default();
    }
    Ok(())
}

/// Map a row to a User (without rate overrides)
fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let employment_type: String = row.get(9)?;
    let last_report_day: i64 = row.get(12)?;

    Ok(User {
        id: row.get(0)?,
        number: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        id_number: row.get(4)?,
        first_name: row.get(5)?,
        last_name: row.get(6)?,
        phone: row.get(7)?,
        is_admin: int_to_bool(row.get(8)?),
        employment_type: employment_type.parse().map_err(|e: TimebookError| {
            rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e))
        })?,
        hourly_rate: row.get(10)?,
        travel_rate: row.get(11)?,
        last_report_day: u32::try_from(last_report_day)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(12, last_report_day))?,
        rates: Vec::new(),
        archived: int_to_bool(row.get(13)?),
        password_hash: row.get(14)?,
        created_at: from_millis(15, row.get(15)?)?,
        updated_at: from_millis(16, row.get(16)?)?,
    })
}

/// Increment a named counter, returning the new value
fn next_sequence_value(tx: &Transaction<'_>, name: &str) -> rusqlite::Result<i64> {
    tx.execute(
        "INSERT INTO sequences (name, value) VALUES (?1, 1)
         ON CONFLICT(name) DO UPDATE SET value = value + 1",
        params![name],
    )?;
    tx.query_row("SELECT value FROM sequences WHERE name = ?1", params![name], |row| row.get(0))
}

fn insert_user(tx: &Transaction<'_>, user: &User) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO users (
            id, number, username, email, id_number, first_name, last_name, phone,
            is_admin, employment_type, hourly_rate, travel_rate, last_report_day, archived,
            password_hash, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            user.id,
            user.number,
            user.username,
            user.email,
            user.id_number,
            user.first_name,
            user.last_name,
            user.phone,
            bool_to_int(user.is_admin),
            user.employment_type.as_str(),
            user.hourly_rate,
            user.travel_rate,
            user.last_report_day,
            bool_to_int(user.archived),
            user.password_hash,
            to_millis(&user.created_at),
            to_millis(&user.updated_at),
        ],
    )?;
    Ok(())
}

fn update_user(tx: &Transaction<'_>, user: &User) -> rusqlite::Result<usize> {
    tx.execute(
        "UPDATE users SET
            username = ?1, email = ?2, id_number = ?3, first_name = ?4, last_name = ?5,
            phone = ?6, is_admin = ?7, employment_type = ?8, hourly_rate = ?9,
            travel_rate = ?10, last_report_day = ?11, archived = ?12, password_hash = ?13,
            updated_at = ?14
         WHERE id = ?15",
        params![
            user.username,
            user.email,
            user.id_number,
            user.first_name,
            user.last_name,
            user.phone,
            bool_to_int(user.is_admin),
            user.employment_type.as_str(),
            user.hourly_rate,
            user.travel_rate,
            user.last_report_day,
            bool_to_int(user.archived),
            user.password_hash,
            to_millis(&user.updated_at),
            user.id, // WHERE clause
        ],
    )
}

fn replace_rates(tx: &Transaction<'_>, user: &User) -> rusqlite::Result<()> {
    tx.execute("DELETE FROM user_rates WHERE user_id = ?1", params![user.id])?;

    let mut stmt = tx.prepare(
        "INSERT INTO user_rates (user_id, client_id, activity_id, position, hourly_rate, travel_rate)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for (position, rate) in user.rates.iter().enumerate() {
        stmt.execute(params![
            user.id,
            rate.client_id,
            rate.activity_id,
            i64::try_from(position).unwrap_or(i64::MAX),
            rate.hourly_rate,
            rate.travel_rate,
        ])?;
    }
    Ok(())
}
