//! # Timebook Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for users, clients, activities and reports
//! - Argon2 password hashing and HS256 access tokens
//! - Configuration loading from the environment or JSON/TOML files
//!
//! ## Architecture
//! - Implements traits defined in `timebook-core`
//! - Depends on `timebook-common`, `timebook-domain` and `timebook-core`
//! - Contains all "impure" code (I/O, clocks, cryptography)

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;

// Re-export commonly used items
pub use auth::{Argon2PasswordHasher, JwtTokenIssuer};
pub use database::{
    DbManager, SqliteActivityRepository, SqliteClientRepository, SqliteReportRepository,
    SqliteUserRepository,
};
pub use errors::InfraError;
pub use timebook_common::storage::HealthStatus as PoolHealth;
