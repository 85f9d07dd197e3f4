//! Logging setup and structured command logging

use std::time::Duration;

use timebook_domain::{LoggingConfig, TimebookError};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `config.level` when set. Calling this twice is a
/// no-op, so tests may share a process.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.json {
        registry.with(tracing_subscriber::fmt::layer().json()).try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if result.is_err() {
        warn!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"reports::aggregate"`; callers
/// must not put request data in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&TimebookError>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            "command_execution_failure"
        ),
    }
}

/// Convert a `TimebookError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &TimebookError) -> &'static str {
    match error {
        TimebookError::Validation { .. } => "validation",
        TimebookError::Duplicate { .. } => "duplicate",
        TimebookError::NotFound(_) => "not_found",
        TimebookError::Auth(_) => "auth",
        TimebookError::Forbidden(_) => "forbidden",
        TimebookError::Integrity(_) => "integrity",
        TimebookError::Database(_) => "database",
        TimebookError::Config(_) => "config",
        TimebookError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&TimebookError::validation("x")), "validation");
        assert_eq!(error_label(&TimebookError::Duplicate { field: "name".into() }), "duplicate");
        assert_eq!(error_label(&TimebookError::Integrity("x".into())), "integrity");
    }

    #[test]
    fn init_twice_does_not_panic() {
        let config = LoggingConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }
}
