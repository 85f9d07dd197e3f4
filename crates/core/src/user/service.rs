//! User directory service

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use timebook_common::{StringValidator, Validator};
use timebook_domain::constants::{MAX_LAST_REPORT_DAY, MIN_PASSWORD_LENGTH};
use timebook_domain::{
    archived_value, new_id, BootstrapAdmin, EmploymentType, Result, TimebookError, User, UserInput,
};
use tracing::{info, warn};

use super::ports::UserRepository;
use crate::auth::ports::PasswordHashing;
use crate::catalog::ports::{ActivityRepository, ClientRepository};
use crate::validation::into_domain_error;

/// Manages users and their credentials
pub struct UserService {
    users: Arc<dyn UserRepository>,
    clients: Arc<dyn ClientRepository>,
    activities: Arc<dyn ActivityRepository>,
    passwords: Arc<dyn PasswordHashing>,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        users: Arc<dyn UserRepository>,
        clients: Arc<dyn ClientRepository>,
        activities: Arc<dyn ActivityRepository>,
        passwords: Arc<dyn PasswordHashing>,
    ) -> Self {
        Self { users, clients, activities, passwords }
    }

    /// Active users, by display number
    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list_active().await
    }

    /// Get a user by id
    pub async fn get(&self, id: &str) -> Result<User> {
        self.users.find_by_id(id).await?.ok_or_else(|| TimebookError::not_found("User"))
    }

    /// Create a user. A password is required.
    pub async fn create(&self, input: UserInput) -> Result<User> {
        let mut v = Validator::new();
        validate_profile(&mut v, &input);
        match input.password.as_deref() {
            Some(password) => validate_password(&mut v, "password", password),
            None => v.add_error("password", "cannot be empty"),
        }
        v.finalize().map_err(into_domain_error)?;
        self.ensure_rate_references(&input).await?;

        let password_hash = match input.password.as_deref() {
            Some(password) => self.passwords.hash(password).await?,
            None => return Err(TimebookError::field("password", "cannot be empty")),
        };

        let now = Utc::now();
        let user = User {
            id: new_id(),
            number: 0,
            username: input.username.trim().to_string(),
            email: input.email.trim().to_string(),
            id_number: input.id_number.trim().to_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            phone: input.phone,
            is_admin: input.is_admin,
            employment_type: input.employment_type,
            hourly_rate: input.hourly_rate,
            travel_rate: input.travel_rate,
            last_report_day: input.last_report_day,
            rates: input.rates,
            archived: false,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let user = self.users.create(user).await?;
        info!(user_id = %user.id, number = user.number, is_admin = user.is_admin, "User created");
        Ok(user)
    }

    /// Update a user's profile; a present password resets it.
    pub async fn update(&self, id: &str, input: UserInput) -> Result<User> {
        let mut user = self.get_active(id).await?;

        let mut v = Validator::new();
        validate_profile(&mut v, &input);
        if let Some(password) = input.password.as_deref() {
            validate_password(&mut v, "password", password);
        }
        v.finalize().map_err(into_domain_error)?;
        self.ensure_rate_references(&input).await?;

        if let Some(password) = input.password.as_deref() {
            user.password_hash = self.passwords.hash(password).await?;
        }
        user.username = input.username.trim().to_string();
        user.email = input.email.trim().to_string();
        user.id_number = input.id_number.trim().to_string();
        user.first_name = input.first_name.trim().to_string();
        user.last_name = input.last_name.trim().to_string();
        user.phone = input.phone;
        user.is_admin = input.is_admin;
        user.employment_type = input.employment_type;
        user.hourly_rate = input.hourly_rate;
        user.travel_rate = input.travel_rate;
        user.last_report_day = input.last_report_day;
        user.rates = input.rates;
        user.updated_at = Utc::now();

        self.users.update(&user).await?;
        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Archive a user, freeing their username, e-mail and id number.
    pub async fn archive(&self, id: &str) -> Result<User> {
        let mut user = self.get_active(id).await?;

        user.username = archived_value(&user.username, &user.id);
        user.email = archived_value(&user.email, &user.id);
        user.id_number = archived_value(&user.id_number, &user.id);
        user.archived = true;
        user.updated_at = Utc::now();

        self.users.update(&user).await?;
        info!(user_id = %user.id, "User archived");
        Ok(user)
    }

    /// Change the caller's own password after checking the current one.
    pub async fn change_password(&self, user: &User, current: &str, new: &str) -> Result<()> {
        if !self.passwords.verify(current, &user.password_hash).await? {
            warn!(user_id = %user.id, "Password change rejected: wrong current password");
            return Err(TimebookError::field("currentPassword", "is incorrect"));
        }

        let mut v = Validator::new();
        validate_password(&mut v, "newPassword", new);
        v.finalize().map_err(into_domain_error)?;

        let mut updated = user.clone();
        updated.password_hash = self.passwords.hash(new).await?;
        updated.updated_at = Utc::now();
        self.users.update(&updated).await?;

        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Create the configured administrator when no user exists yet.
    ///
    /// Returns the new admin, or `None` when users already exist.
    pub async fn ensure_bootstrap_admin(&self, admin: &BootstrapAdmin) -> Result<Option<User>> {
        if self.users.count().await? > 0 {
            return Ok(None);
        }

        // The admin has no national id; the username stands in for it.
        let input = UserInput {
            username: admin.username.clone(),
            email: admin.email.clone(),
            id_number: admin.username.clone(),
            first_name: or_default(&admin.first_name, "Timebook"),
            last_name: or_default(&admin.last_name, "Administrator"),
            phone: None,
            password: Some(admin.password.clone()),
            is_admin: true,
            employment_type: EmploymentType::Employee,
            hourly_rate: None,
            travel_rate: None,
            last_report_day: 0,
            rates: Vec::new(),
        };
        let user = self.create(input).await?;
        info!(user_id = %user.id, username = %user.username, "Bootstrap administrator created");
        Ok(Some(user))
    }

    async fn get_active(&self, id: &str) -> Result<User> {
        match self.users.find_by_id(id).await? {
            Some(user) if !user.archived => Ok(user),
            _ => Err(TimebookError::not_found("User")),
        }
    }

    /// Every rate override must name an existing client and activity.
    async fn ensure_rate_references(&self, input: &UserInput) -> Result<()> {
        if input.rates.is_empty() {
            return Ok(());
        }

        let client_ids: Vec<String> =
            input.rates.iter().map(|r| r.client_id.clone()).collect::<BTreeSet<_>>().into_iter().collect();
        let activity_ids: Vec<String> =
            input.rates.iter().map(|r| r.activity_id.clone()).collect::<BTreeSet<_>>().into_iter().collect();

        let (clients, activities) = tokio::try_join!(
            self.clients.find_by_ids(&client_ids),
            self.activities.find_by_ids(&activity_ids),
        )?;

        let mut v = Validator::new();
        v.validate_nested("rates", |v| {
            for (i, rate) in input.rates.iter().enumerate() {
                v.validate_nested(&i.to_string(), |v| {
                    if !clients.iter().any(|c| c.id == rate.client_id && !c.archived) {
                        v.add_error("clientId", "does not exist");
                    }
                    if !activities.iter().any(|a| a.id == rate.activity_id && !a.archived) {
                        v.add_error("activityId", "does not exist");
                    }
                });
            }
        });
        v.finalize().map_err(into_domain_error)
    }
}

fn validate_profile(v: &mut Validator, input: &UserInput) {
    v.validate_not_empty("username", &input.username);
    v.validate_field("email", input.email.as_str(), &StringValidator::email());
    v.validate_not_empty("idNumber", &input.id_number);
    v.validate_not_empty("firstName", &input.first_name);
    v.validate_not_empty("lastName", &input.last_name);
    v.validate_optional_min("hourlyRate", input.hourly_rate, 0.0);
    v.validate_optional_min("travelRate", input.travel_rate, 0.0);
    v.validate_range("lastReportDay", input.last_report_day, 0, MAX_LAST_REPORT_DAY);

    let mut seen = BTreeSet::new();
    v.validate_nested("rates", |v| {
        for (i, rate) in input.rates.iter().enumerate() {
            v.validate_nested(&i.to_string(), |v| {
                v.validate_optional_min("hourlyRate", rate.hourly_rate, 0.0);
                v.validate_optional_min("travelRate", rate.travel_rate, 0.0);
                if !seen.insert((rate.client_id.as_str(), rate.activity_id.as_str())) {
                    v.add_error("activityId", "is listed twice for this client");
                }
            });
        }
    });
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn validate_password(v: &mut Validator, field: &str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        v.add_error(field, format!("must be at least {MIN_PASSWORD_LENGTH} characters"));
    }
}
