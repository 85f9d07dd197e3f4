//! # Timebook Domain
//!
//! Business domain types and models for Timebook.
//!
//! This crate contains:
//! - Users, clients, activities and time-tracking reports
//! - Report aggregation inputs and outputs
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Calendar helpers (month ranges, the edit window)
//!
//! ## Architecture
//! - No dependencies on other Timebook crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::calendar::{edit_cutoff, month_range, parse_range_bound, DateRange};
