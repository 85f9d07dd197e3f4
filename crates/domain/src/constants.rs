//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Configuration defaults
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "timebook.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 8;
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 12 * 60 * 60;
pub const MAX_TOKEN_TTL_SECONDS: u64 = 366 * 24 * 60 * 60;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Archiving
pub const ARCHIVE_MARKER: &str = "~archived~";

// Reports
pub const MAX_FILTER_IDS: usize = 500;

// Users
pub const MAX_LAST_REPORT_DAY: u32 = 31;
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Validation messages
pub const INVALID_MONTH_MESSAGE: &str = "Month must be between 1 and 12!";
