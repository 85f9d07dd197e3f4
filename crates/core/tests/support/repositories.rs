//! In-memory implementations of the core ports.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use timebook_core::{
    ActivityRepository, ClientRepository, IssuedToken, PasswordHashing, ReportRepository,
    TokenClaims, TokenIssuer, UserRepository,
};
use timebook_domain::{
    Activity, Client, DateRange, Report, ReportFilter, Result as DomainResult, TimebookError, User,
};

/// In-memory mock for `UserRepository`.
///
/// Enforces the same unique fields as the SQLite schema.
#[derive(Default, Clone)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    /// Create a new mock seeded with the provided users.
    pub fn new(users: Vec<User>) -> Self {
        Self { users: Arc::new(Mutex::new(users)) }
    }

    /// Snapshot of everything stored, archived included.
    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<User>> {
        Ok(self.users.lock().unwrap().iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username && !u.archived)
            .cloned())
    }

    async fn list_active(&self) -> DomainResult<Vec<User>> {
        Ok(self.users.lock().unwrap().iter().filter(|u| !u.archived).cloned().collect())
    }

    async fn count(&self) -> DomainResult<i64> {
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn create(&self, mut user: User) -> DomainResult<User> {
        let mut users = self.users.lock().unwrap();
        check_unique_user(&users, &user)?;
        user.number = users.iter().map(|u| u.number).max().unwrap_or(0) + 1;
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> DomainResult<()> {
        let mut users = self.users.lock().unwrap();
        check_unique_user(&users, user)?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(TimebookError::not_found("User")),
        }
    }
}

fn check_unique_user(users: &[User], user: &User) -> DomainResult<()> {
    for other in users.iter().filter(|u| u.id != user.id) {
        if other.username == user.username {
            return Err(TimebookError::Duplicate { field: "username".into() });
        }
        if other.email == user.email {
            return Err(TimebookError::Duplicate { field: "email".into() });
        }
        if other.id_number == user.id_number {
            return Err(TimebookError::Duplicate { field: "idNumber".into() });
        }
    }
    Ok(())
}

/// In-memory mock for `ClientRepository`.
#[derive(Default, Clone)]
pub struct MockClientRepository {
    clients: Arc<Mutex<Vec<Client>>>,
}

impl MockClientRepository {
    /// Create a new mock seeded with the provided clients.
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients: Arc::new(Mutex::new(clients)) }
    }
}

#[async_trait]
impl ClientRepository for MockClientRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Client>> {
        Ok(self.clients.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Client>> {
        Ok(self.clients.lock().unwrap().iter().filter(|c| ids.contains(&c.id)).cloned().collect())
    }

    async fn list_active(&self) -> DomainResult<Vec<Client>> {
        let mut clients: Vec<Client> =
            self.clients.lock().unwrap().iter().filter(|c| !c.archived).cloned().collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }

    async fn create(&self, client: &Client) -> DomainResult<()> {
        let mut clients = self.clients.lock().unwrap();
        if clients.iter().any(|c| c.name == client.name) {
            return Err(TimebookError::Duplicate { field: "name".into() });
        }
        clients.push(client.clone());
        Ok(())
    }

    async fn update(&self, client: &Client) -> DomainResult<()> {
        let mut clients = self.clients.lock().unwrap();
        if clients.iter().any(|c| c.id != client.id && c.name == client.name) {
            return Err(TimebookError::Duplicate { field: "name".into() });
        }
        match clients.iter_mut().find(|c| c.id == client.id) {
            Some(slot) => {
                *slot = client.clone();
                Ok(())
            }
            None => Err(TimebookError::not_found("Client")),
        }
    }
}

/// In-memory mock for `ActivityRepository`.
#[derive(Default, Clone)]
pub struct MockActivityRepository {
    activities: Arc<Mutex<Vec<Activity>>>,
}

impl MockActivityRepository {
    /// Create a new mock seeded with the provided activities.
    pub fn new(activities: Vec<Activity>) -> Self {
        Self { activities: Arc::new(Mutex::new(activities)) }
    }
}

#[async_trait]
impl ActivityRepository for MockActivityRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Activity>> {
        Ok(self.activities.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<Activity>> {
        Ok(self
            .activities
            .lock()
            .unwrap()
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list_active(&self) -> DomainResult<Vec<Activity>> {
        let mut activities: Vec<Activity> =
            self.activities.lock().unwrap().iter().filter(|a| !a.archived).cloned().collect();
        activities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(activities)
    }

    async fn create(&self, activity: &Activity) -> DomainResult<()> {
        let mut activities = self.activities.lock().unwrap();
        if activities.iter().any(|a| a.name == activity.name) {
            return Err(TimebookError::Duplicate { field: "name".into() });
        }
        activities.push(activity.clone());
        Ok(())
    }

    async fn update(&self, activity: &Activity) -> DomainResult<()> {
        let mut activities = self.activities.lock().unwrap();
        if activities.iter().any(|a| a.id != activity.id && a.name == activity.name) {
            return Err(TimebookError::Duplicate { field: "name".into() });
        }
        match activities.iter_mut().find(|a| a.id == activity.id) {
            Some(slot) => {
                *slot = activity.clone();
                Ok(())
            }
            None => Err(TimebookError::not_found("Activity")),
        }
    }
}

/// In-memory mock for `ReportRepository`.
#[derive(Default, Clone)]
pub struct MockReportRepository {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl MockReportRepository {
    /// Create a new mock seeded with the provided reports.
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports: Arc::new(Mutex::new(reports)) }
    }

    /// Snapshot of every stored report.
    pub fn all(&self) -> Vec<Report> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReportRepository for MockReportRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Report>> {
        Ok(self.reports.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_in_range(
        &self,
        range: DateRange,
        filter: &ReportFilter,
    ) -> DomainResult<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .lock()
            .unwrap()
            .iter()
            .filter(|r| range.contains(r.date) && filter.matches(r))
            .cloned()
            .collect();
        reports.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(reports)
    }

    async fn create(&self, report: &Report) -> DomainResult<()> {
        self.reports.lock().unwrap().push(report.clone());
        Ok(())
    }

    async fn update(&self, report: &Report) -> DomainResult<()> {
        let mut reports = self.reports.lock().unwrap();
        match reports.iter_mut().find(|r| r.id == report.id) {
            Some(slot) => {
                *slot = report.clone();
                Ok(())
            }
            None => Err(TimebookError::not_found("Report")),
        }
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let mut reports = self.reports.lock().unwrap();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        Ok(reports.len() != before)
    }
}

/// Reversible "hash" so tests can assert on stored values.
#[derive(Default, Clone)]
pub struct PlainPasswords;

#[async_trait]
impl PasswordHashing for PlainPasswords {
    async fn hash(&self, password: &str) -> DomainResult<String> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Unsigned tokens of the form `token:{user id}`.
#[derive(Default, Clone)]
pub struct MockTokenIssuer;

impl TokenIssuer for MockTokenIssuer {
    fn issue(&self, user: &User) -> DomainResult<IssuedToken> {
        Ok(IssuedToken {
            token: format!("token:{}", user.id),
            expires_at: Utc::now() + chrono::Duration::hours(1),
        })
    }

    fn verify(&self, token: &str) -> DomainResult<TokenClaims> {
        let sub = token
            .strip_prefix("token:")
            .ok_or_else(|| TimebookError::Auth("Invalid token".into()))?;
        let now = Utc::now().timestamp();
        Ok(TokenClaims { sub: sub.to_string(), adm: false, iat: now, exp: now + 3600 })
    }
}
