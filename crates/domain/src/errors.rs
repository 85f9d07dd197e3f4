//! Error types used throughout the application

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Timebook
///
/// The first group of variants are *user errors*: they are caused by the
/// request and are reported back verbatim. Everything else is a *system
/// error*, logged in full and shown to clients only as an opaque message.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum TimebookError {
    #[error("{message}")]
    Validation { message: String, fields: BTreeMap<String, String> },

    #[error("{field} already exists")]
    Duplicate { field: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Data integrity error: {0}")]
    Integrity(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TimebookError {
    /// User error without field details.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), fields: BTreeMap::new() }
    }

    /// User error pinned to a single field.
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        let reason = reason.into();
        Self::Validation {
            message: format!("{field} {reason}"),
            fields: BTreeMap::from([(field, reason)]),
        }
    }

    /// `"{what} not found"`
    pub fn not_found(what: &str) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    /// Whether the caller caused this error.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Duplicate { .. } | Self::NotFound(_))
    }

    /// Field-level details, if any.
    pub fn fields(&self) -> Option<BTreeMap<String, String>> {
        match self {
            Self::Validation { fields, .. } if !fields.is_empty() => Some(fields.clone()),
            Self::Duplicate { field } => {
                Some(BTreeMap::from([(field.clone(), "already exists".to_string())]))
            }
            _ => None,
        }
    }
}

/// Result type alias for Timebook operations
pub type Result<T> = std::result::Result<T, TimebookError>;
