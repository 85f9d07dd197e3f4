//! End-to-end coverage for the SQLite repositories.
//!
//! Each test runs against an isolated database with the real schema
//! applied.

mod support;

use chrono::Duration;
use timebook_core::{ActivityRepository, ClientRepository, ReportRepository, UserRepository};
use timebook_domain::{archived_value, DateRange, ReportFilter, TimebookError, UserRate};
use timebook_infra::database::{
    SqliteActivityRepository, SqliteClientRepository, SqliteReportRepository,
    SqliteUserRepository,
};

use support::{activity, client, date, report, user, TestDatabase};

struct Repos {
    users: SqliteUserRepository,
    clients: SqliteClientRepository,
    activities: SqliteActivityRepository,
    reports: SqliteReportRepository,
    _db: TestDatabase,
}

fn repos() -> Repos {
    let db = TestDatabase::new();
    Repos {
        users: SqliteUserRepository::new(db.manager.clone()),
        clients: SqliteClientRepository::new(db.manager.clone()),
        activities: SqliteActivityRepository::new(db.manager.clone()),
        reports: SqliteReportRepository::new(db.manager.clone()),
        _db: db,
    }
}

/// Two activities, one client offering both, one user.
async fn seeded() -> Repos {
    let repos = repos();
    repos.activities.create(&activity("a1", "Cleaning")).await.unwrap();
    repos.activities.create(&activity("a2", "Travel")).await.unwrap();
    repos
        .clients
        .create(&client("c1", "Acme", &[("a1", Some(40.0)), ("a2", None)]))
        .await
        .unwrap();
    repos.users.create(user("u1", "ana")).await.unwrap();
    repos
}

#[tokio::test(flavor = "multi_thread")]
async fn users_get_sequential_numbers() {
    let repos = repos();

    let first = repos.users.create(user("u1", "ana")).await.unwrap();
    let second = repos.users.create(user("u2", "ivo")).await.unwrap();

    assert_eq!(first.number, 1);
    assert_eq!(second.number, 2);
    assert_eq!(repos.users.count().await.unwrap(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn user_roundtrip_keeps_rates_in_order() {
    let repos = seeded().await;
    let mut stored = repos.users.find_by_id("u1").await.unwrap().unwrap();
    stored.rates = vec![
        UserRate {
            client_id: "c1".into(),
            activity_id: "a2".into(),
            hourly_rate: None,
            travel_rate: Some(15.0),
        },
        UserRate {
            client_id: "c1".into(),
            activity_id: "a1".into(),
            hourly_rate: Some(12.5),
            travel_rate: None,
        },
    ];
    repos.users.update(&stored).await.unwrap();

    let loaded = repos.users.find_by_username("ana").await.unwrap().unwrap();
    assert_eq!(loaded, stored);
    assert_eq!(loaded.rates[0].activity_id, "a2");
    assert_eq!(loaded.rate_for("c1", "a1").unwrap().hourly_rate, Some(12.5));
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_user_fields_are_reported_by_name() {
    let repos = seeded().await;

    let mut same_email = user("u2", "ivo");
    same_email.email = "ana@example.com".into();
    let err = repos.users.create(same_email).await.unwrap_err();
    assert_eq!(err, TimebookError::Duplicate { field: "email".into() });

    let mut same_id_number = user("u3", "eva");
    same_id_number.id_number = "id-ana".into();
    let err = repos.users.create(same_id_number).await.unwrap_err();
    assert_eq!(err, TimebookError::Duplicate { field: "idNumber".into() });

    // Failed inserts must not leave partial rows behind.
    assert_eq!(repos.users.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn archived_user_frees_username() {
    let repos = seeded().await;
    let mut ana = repos.users.find_by_id("u1").await.unwrap().unwrap();
    ana.username = archived_value(&ana.username, &ana.id);
    ana.email = archived_value(&ana.email, &ana.id);
    ana.id_number = archived_value(&ana.id_number, &ana.id);
    ana.archived = true;
    repos.users.update(&ana).await.unwrap();

    assert!(repos.users.find_by_username("ana").await.unwrap().is_none());
    assert!(repos.users.list_active().await.unwrap().is_empty());
    // Archived users stay resolvable by id for old reports.
    assert!(repos.users.find_by_id("u1").await.unwrap().unwrap().archived);

    let again = repos.users.create(user("u2", "ana")).await.unwrap();
    assert_eq!(again.number, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn updating_missing_user_is_not_found() {
    let repos = repos();
    let err = repos.users.update(&user("ghost", "ghost")).await.unwrap_err();
    assert_eq!(err, TimebookError::not_found("User"));
}

#[tokio::test(flavor = "multi_thread")]
async fn client_activities_replace_on_update() {
    let repos = seeded().await;

    let mut acme = repos.clients.find_by_id("c1").await.unwrap().unwrap();
    assert_eq!(acme.activities.len(), 2);
    assert_eq!(acme.rate_for("a1"), Some(40.0));
    assert_eq!(acme.contact.contact_name.as_deref(), Some("Iva"));

    acme.activities.remove(0);
    acme.name = "Acme d.o.o.".into();
    acme.updated_at += Duration::minutes(5);
    repos.clients.update(&acme).await.unwrap();

    let loaded = repos.clients.find_by_ids(&["c1".to_string()]).await.unwrap();
    assert_eq!(loaded, vec![acme]);
}

#[tokio::test(flavor = "multi_thread")]
async fn catalog_names_are_unique() {
    let repos = seeded().await;

    let err = repos.activities.create(&activity("a3", "Cleaning")).await.unwrap_err();
    assert_eq!(err, TimebookError::Duplicate { field: "name".into() });

    let err = repos.clients.create(&client("c2", "Acme", &[])).await.unwrap_err();
    assert_eq!(err, TimebookError::Duplicate { field: "name".into() });
}

#[tokio::test(flavor = "multi_thread")]
async fn list_active_skips_archived_and_sorts_by_name() {
    let repos = seeded().await;
    repos.activities.create(&activity("a3", "archiving")).await.unwrap();

    let mut travel = repos.activities.find_by_id("a2").await.unwrap().unwrap();
    travel.archived = true;
    travel.name = archived_value(&travel.name, &travel.id);
    repos.activities.update(&travel).await.unwrap();

    let names: Vec<String> =
        repos.activities.list_active().await.unwrap().into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["archiving".to_string(), "Cleaning".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn reports_in_range_are_ordered_and_filtered() {
    let repos = seeded().await;
    repos.users.create(user("u2", "ivo")).await.unwrap();

    let mut late = report("r-late", "u1", "c1", "a1", date(2024, 2, 10));
    late.created_at += Duration::hours(1);
    repos.reports.create(&late).await.unwrap();
    repos.reports.create(&report("r-early", "u1", "c1", "a1", date(2024, 2, 10))).await.unwrap();
    repos.reports.create(&report("r-first", "u2", "c1", "a2", date(2024, 2, 1))).await.unwrap();
    repos.reports.create(&report("r-march", "u1", "c1", "a1", date(2024, 3, 1))).await.unwrap();

    let february = DateRange::new(date(2024, 2, 1), date(2024, 3, 1));
    let all = repos.reports.find_in_range(february, &ReportFilter::default()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r-first", "r-early", "r-late"]);
    assert_eq!(all[1].notes, "windows, \"east\" wing");
    assert_eq!(all[1].duration, 4.5);

    let filter = ReportFilter {
        users: vec!["u1".into()],
        activities: vec!["a1".into(), "a2".into()],
        ..ReportFilter::default()
    };
    let ana = repos.reports.find_in_range(february, &filter).await.unwrap();
    assert!(ana.iter().all(|r| r.user_id == "u1"));
    assert_eq!(ana.len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn report_update_and_delete() {
    let repos = seeded().await;
    let mut stored = report("r1", "u1", "c1", "a1", date(2024, 2, 10));
    repos.reports.create(&stored).await.unwrap();

    stored.date = date(2024, 2, 11);
    stored.activity_id = "a2".into();
    stored.duration = 2.0;
    repos.reports.update(&stored).await.unwrap();
    assert_eq!(repos.reports.find_by_id("r1").await.unwrap(), Some(stored));

    assert!(repos.reports.delete("r1").await.unwrap());
    assert!(!repos.reports.delete("r1").await.unwrap());
    assert!(repos.reports.find_by_id("r1").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn report_with_unknown_reference_violates_integrity() {
    let repos = seeded().await;
    let err = repos
        .reports
        .create(&report("r1", "ghost", "c1", "a1", date(2024, 2, 10)))
        .await
        .unwrap_err();

    assert!(matches!(err, TimebookError::Integrity(_)));
}
