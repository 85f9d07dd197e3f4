//! Database implementations

mod sql;

pub mod activity_repository;
pub mod client_repository;
pub mod manager;
pub mod report_repository;
pub mod user_repository;

pub use activity_repository::SqliteActivityRepository;
pub use client_repository::SqliteClientRepository;
pub use manager::DbManager;
pub use report_repository::SqliteReportRepository;
pub use user_repository::SqliteUserRepository;
