//! # Timebook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (repository and token traits)
//! - Report aggregation, rate resolution and CSV export
//! - Use cases: time tracking, user directory, client/activity catalog,
//!   authentication
//!
//! ## Architecture Principles
//! - Only depends on `timebook-domain` and `timebook-common`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - The acting user is always passed in explicitly

pub mod auth;
pub mod catalog;
pub mod clock;
pub mod reporting;
pub mod tracking;
pub mod user;
pub mod validation;

pub use auth::ports::{IssuedToken, PasswordHashing, TokenClaims, TokenIssuer};
pub use auth::{AuthService, LoginResponse};
pub use catalog::ports::{ActivityRepository, ClientRepository};
pub use catalog::CatalogService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use reporting::ReportAggregator;
pub use tracking::ports::ReportRepository;
pub use tracking::TimeTrackingService;
pub use user::ports::UserRepository;
pub use user::UserService;
