//! Application context - dependency injection container

use std::sync::Arc;

use timebook_core::{
    ActivityRepository, AuthService, CatalogService, ClientRepository, Clock, PasswordHashing,
    ReportAggregator, ReportRepository, SystemClock, TimeTrackingService, TokenIssuer,
    UserRepository, UserService,
};
use timebook_domain::{Config, Result};
use timebook_infra::{
    Argon2PasswordHasher, DbManager, JwtTokenIssuer, SqliteActivityRepository,
    SqliteClientRepository, SqliteReportRepository, SqliteUserRepository,
};
use tracing::info;

/// Application context - holds all services and dependencies
///
/// Shared by every request as `Arc<AppContext>` router state.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub catalog: Arc<CatalogService>,
    pub time_tracking: Arc<TimeTrackingService>,
    pub reports: Arc<ReportAggregator>,
}

impl AppContext {
    /// Open the configured database, apply the schema and wire the services.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Same as [`AppContext::new`], with the edit-window clock supplied.
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db.clone()));
        let client_repo: Arc<dyn ClientRepository> =
            Arc::new(SqliteClientRepository::new(db.clone()));
        let activity_repo: Arc<dyn ActivityRepository> =
            Arc::new(SqliteActivityRepository::new(db.clone()));
        let report_repo: Arc<dyn ReportRepository> =
            Arc::new(SqliteReportRepository::new(db.clone()));

        let passwords: Arc<dyn PasswordHashing> = Arc::new(Argon2PasswordHasher::new());
        let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl_seconds,
        ));

        let auth = AuthService::new(user_repo.clone(), passwords.clone(), tokens);
        let users = UserService::new(
            user_repo.clone(),
            client_repo.clone(),
            activity_repo.clone(),
            passwords,
        );
        let catalog = CatalogService::new(client_repo.clone(), activity_repo.clone());
        let time_tracking = TimeTrackingService::new(
            report_repo.clone(),
            user_repo.clone(),
            client_repo.clone(),
            activity_repo.clone(),
        )
        .with_clock(clock);
        let reports = ReportAggregator::new(report_repo, user_repo, client_repo, activity_repo);

        info!(db_path = %db.path().display(), "Application context ready");

        Ok(Self {
            config,
            db,
            auth: Arc::new(auth),
            users: Arc::new(users),
            catalog: Arc::new(catalog),
            time_tracking: Arc::new(time_tracking),
            reports: Arc::new(reports),
        })
    }

    /// Create the configured first administrator if no users exist yet.
    pub async fn ensure_bootstrap_admin(&self) -> Result<()> {
        let Some(admin) = &self.config.auth.bootstrap_admin else {
            return Ok(());
        };

        self.users.ensure_bootstrap_admin(admin).await.map(|_| ())
    }
}
