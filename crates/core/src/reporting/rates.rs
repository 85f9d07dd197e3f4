//! Rate resolution
//!
//! Salary rates come from the user: a per-(client, activity) override,
//! then the user's default, then zero. Billing prices come from the
//! client's per-activity override, then the activity default, then zero.

use timebook_domain::{Activity, Client, Report, User};

/// Hourly pay for `report`.
pub fn user_hourly_rate(user: &User, report: &Report) -> f64 {
    user.rate_for(&report.client_id, &report.activity_id)
        .and_then(|rate| rate.hourly_rate)
        .or(user.hourly_rate)
        .unwrap_or(0.0)
}

/// Travel allowance for the day of `report`.
pub fn user_travel_rate(user: &User, report: &Report) -> f64 {
    user.rate_for(&report.client_id, &report.activity_id)
        .and_then(|rate| rate.travel_rate)
        .or(user.travel_rate)
        .unwrap_or(0.0)
}

/// Hourly price billed to `client` for `activity`.
pub fn client_price_rate(client: &Client, activity: &Activity) -> f64 {
    client.rate_for(&activity.id).or(activity.hourly_rate).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use timebook_domain::{ClientActivityRate, ClientContact, EmploymentType, UserRate};

    use super::*;

    fn user(hourly: Option<f64>, travel: Option<f64>, rates: Vec<UserRate>) -> User {
        let now = Utc::now();
        User {
            id: "u1".into(),
            number: 1,
            username: "ana".into(),
            email: "ana@example.com".into(),
            id_number: "1".into(),
            first_name: "Ana".into(),
            last_name: "Horvat".into(),
            phone: None,
            is_admin: false,
            employment_type: EmploymentType::Employee,
            hourly_rate: hourly,
            travel_rate: travel,
            last_report_day: 0,
            rates,
            archived: false,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn report() -> Report {
        let now = Utc::now();
        Report {
            id: "r1".into(),
            user_id: "u1".into(),
            client_id: "c1".into(),
            activity_id: "a1".into(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            start_time: "08:00".into(),
            end_time: "12:00".into(),
            duration: 4.0,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn override_rate(hourly: Option<f64>, travel: Option<f64>) -> UserRate {
        UserRate {
            client_id: "c1".into(),
            activity_id: "a1".into(),
            hourly_rate: hourly,
            travel_rate: travel,
        }
    }

    #[test]
    fn user_override_wins() {
        let u = user(Some(10.0), Some(2.0), vec![override_rate(Some(15.0), Some(5.0))]);
        assert_eq!(user_hourly_rate(&u, &report()), 15.0);
        assert_eq!(user_travel_rate(&u, &report()), 5.0);
    }

    #[test]
    fn partial_override_falls_back_per_field() {
        let u = user(Some(10.0), Some(2.0), vec![override_rate(None, Some(5.0))]);
        assert_eq!(user_hourly_rate(&u, &report()), 10.0);
        assert_eq!(user_travel_rate(&u, &report()), 5.0);
    }

    #[test]
    fn missing_rates_resolve_to_zero() {
        let u = user(None, None, Vec::new());
        assert_eq!(user_hourly_rate(&u, &report()), 0.0);
        assert_eq!(user_travel_rate(&u, &report()), 0.0);
    }

    #[test]
    fn client_price_precedence() {
        let now = Utc::now();
        let mut activity = Activity {
            id: "a1".into(),
            name: "Cleaning".into(),
            hourly_rate: Some(30.0),
            archived: false,
            created_at: now,
            updated_at: now,
        };
        let mut client = Client {
            id: "c1".into(),
            name: "Acme".into(),
            contact: ClientContact::default(),
            activities: vec![ClientActivityRate { activity_id: "a1".into(), hourly_rate: Some(45.0) }],
            archived: false,
            created_at: now,
            updated_at: now,
        };

        assert_eq!(client_price_rate(&client, &activity), 45.0);
        client.activities.clear();
        assert_eq!(client_price_rate(&client, &activity), 30.0);
        activity.hourly_rate = None;
        assert_eq!(client_price_rate(&client, &activity), 0.0);
    }
}
