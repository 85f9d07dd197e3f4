//! Shared fixtures for the infrastructure integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::TempDir;
use timebook_domain::{
    Activity, Client, ClientActivityRate, ClientContact, EmploymentType, Report, User,
};
use timebook_infra::database::DbManager;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("schema migrations should apply");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }
}

/// Fixed instant with whole milliseconds, so it survives storage unchanged.
pub fn instant() -> chrono::DateTime<Utc> {
    Utc.timestamp_millis_opt(1_706_745_600_000).single().expect("valid instant")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn user(id: &str, username: &str) -> User {
    User {
        id: id.into(),
        number: 0,
        username: username.into(),
        email: format!("{username}@example.com"),
        id_number: format!("id-{username}"),
        first_name: "Ana".into(),
        last_name: "Horvat".into(),
        phone: None,
        is_admin: false,
        employment_type: EmploymentType::Contractor,
        hourly_rate: Some(10.0),
        travel_rate: None,
        last_report_day: 5,
        rates: Vec::new(),
        archived: false,
        password_hash: "$argon2id$stub".into(),
        created_at: instant(),
        updated_at: instant(),
    }
}

pub fn activity(id: &str, name: &str) -> Activity {
    Activity {
        id: id.into(),
        name: name.into(),
        hourly_rate: Some(25.0),
        archived: false,
        created_at: instant(),
        updated_at: instant(),
    }
}

pub fn client(id: &str, name: &str, activities: &[(&str, Option<f64>)]) -> Client {
    Client {
        id: id.into(),
        name: name.into(),
        contact: ClientContact {
            contact_name: Some("Iva".into()),
            email: Some("iva@example.com".into()),
            ..ClientContact::default()
        },
        activities: activities
            .iter()
            .map(|(activity_id, hourly_rate)| ClientActivityRate {
                activity_id: (*activity_id).into(),
                hourly_rate: *hourly_rate,
            })
            .collect(),
        archived: false,
        created_at: instant(),
        updated_at: instant(),
    }
}

pub fn report(id: &str, user: &str, client: &str, activity: &str, day: NaiveDate) -> Report {
    Report {
        id: id.into(),
        user_id: user.into(),
        client_id: client.into(),
        activity_id: activity.into(),
        date: day,
        start_time: "08:00".into(),
        end_time: "12:30".into(),
        duration: 4.5,
        notes: "windows, \"east\" wing".into(),
        created_at: instant(),
        updated_at: instant(),
    }
}
