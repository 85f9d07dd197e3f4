//! Error classification shared by the layered error types.
//!
//! Every crate keeps its own `thiserror` enum. This module only provides the
//! vocabulary used to decide how loudly an error should be reported:
//!
//! - **`ErrorClassification`**: retryability, severity and criticality
//! - **`ErrorSeverity`**: the level used when logging a failure
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions caused by the caller | Bad input, unknown id |
//! | **Warning** | Degraded but operational | Busy database, pool timeout |
//! | **Error** | Failure requiring attention | Query failure, bad config |
//! | **Critical** | System integrity at risk | Dangling references, failed migration |

use std::fmt;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational, caused by the caller
    Info,
    /// Degraded but recoverable
    Warning,
    /// Failure requiring attention
    Error,
    /// Integrity at risk
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Standard interface for classifying errors.
pub trait ErrorClassification {
    /// Whether the failed operation may succeed if attempted again.
    fn is_retryable(&self) -> bool;

    /// Severity used for logging.
    fn severity(&self) -> ErrorSeverity;

    /// Whether the error signals an integrity problem.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}
