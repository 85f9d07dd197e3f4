//! Modular common utilities shared across Timebook crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification and the field validation framework
//! - `runtime`: password hashing (argon2) with tracing
//! - `platform`: pooled SQLite storage (r2d2 + rusqlite)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod validation;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod security;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "runtime")]
pub use security::{PasswordError, PasswordHasher};
#[cfg(feature = "foundation")]
pub use validation::{
    FieldError, FieldValidator, StringValidator, ValidationError,
    ValidationResult, Validator,
};
