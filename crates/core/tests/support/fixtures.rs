//! Entity builders with sensible defaults.

use chrono::{NaiveDate, Utc};
use timebook_domain::{
    Activity, Client, ClientActivityRate, ClientContact, EmploymentType, Report, ReportInput, User,
    UserRate,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn user(id: &str, first: &str, last: &str) -> User {
    let now = Utc::now();
    User {
        id: id.into(),
        number: 0,
        username: id.into(),
        email: format!("{id}@example.com"),
        id_number: format!("id-{id}"),
        first_name: first.into(),
        last_name: last.into(),
        phone: None,
        is_admin: false,
        employment_type: EmploymentType::Employee,
        hourly_rate: None,
        travel_rate: None,
        last_report_day: 0,
        rates: Vec::new(),
        archived: false,
        password_hash: "plain:secret1".into(),
        created_at: now,
        updated_at: now,
    }
}

pub fn admin(id: &str) -> User {
    User { is_admin: true, ..user(id, "Admin", "User") }
}

pub fn user_rate(client: &str, activity: &str, hourly: Option<f64>, travel: Option<f64>) -> UserRate {
    UserRate {
        client_id: client.into(),
        activity_id: activity.into(),
        hourly_rate: hourly,
        travel_rate: travel,
    }
}

pub fn client(id: &str, name: &str, rates: &[(&str, Option<f64>)]) -> Client {
    let now = Utc::now();
    Client {
        id: id.into(),
        name: name.into(),
        contact: ClientContact::default(),
        activities: rates
            .iter()
            .map(|(activity, rate)| ClientActivityRate {
                activity_id: (*activity).into(),
                hourly_rate: *rate,
            })
            .collect(),
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn activity(id: &str, name: &str, rate: Option<f64>) -> Activity {
    let now = Utc::now();
    Activity {
        id: id.into(),
        name: name.into(),
        hourly_rate: rate,
        archived: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn report(id: &str, user: &str, client: &str, activity: &str, date: NaiveDate, hours: f64) -> Report {
    let now = Utc::now();
    Report {
        id: id.into(),
        user_id: user.into(),
        client_id: client.into(),
        activity_id: activity.into(),
        date,
        start_time: "08:00".into(),
        end_time: "16:00".into(),
        duration: hours,
        notes: String::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn report_input(client: &str, activity: &str, date: NaiveDate) -> ReportInput {
    ReportInput {
        user_id: None,
        client_id: client.into(),
        activity_id: activity.into(),
        date,
        start_time: "08:00".into(),
        end_time: "12:00".into(),
        duration: 4.0,
        notes: "windows".into(),
    }
}
