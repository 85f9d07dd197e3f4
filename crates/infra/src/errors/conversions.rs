//! Conversions from external infrastructure errors into domain errors.

use rusqlite::Error as SqlError;
use timebook_common::storage::StorageError;
use timebook_common::{ErrorClassification, ErrorSeverity};
use timebook_domain::TimebookError;
use tokio::task::JoinError;
use tracing::{debug, error, warn};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TimebookError);

impl From<InfraError> for TimebookError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TimebookError> for InfraError {
    fn from(value: TimebookError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTimebookError {
    fn into_timebook(self) -> TimebookError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → TimebookError */
/* -------------------------------------------------------------------------- */

impl IntoTimebookError for SqlError {
    fn into_timebook(self) -> TimebookError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        TimebookError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        TimebookError::Database("database is locked".into())
                    }
                    // SQLITE_CONSTRAINT_UNIQUE
                    (ErrorCode::ConstraintViolation, 2067) => match unique_field(&message) {
                        Some(field) => TimebookError::Duplicate { field },
                        None => TimebookError::Database(format!("unique constraint violation: {message}")),
                    },
                    // SQLITE_CONSTRAINT_FOREIGNKEY
                    (ErrorCode::ConstraintViolation, 787) => {
                        TimebookError::Integrity("foreign key constraint violation".into())
                    }
                    _ => TimebookError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => TimebookError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                TimebookError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                TimebookError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                TimebookError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                TimebookError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => TimebookError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => TimebookError::Database("invalid SQL query".into()),
            other => TimebookError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_timebook())
    }
}

/// Field named by `UNIQUE constraint failed: users.id_number`, as it appears
/// in the JSON API (`idNumber`).
fn unique_field(message: &str) -> Option<String> {
    let columns = message.strip_prefix("UNIQUE constraint failed: ")?;
    let first = columns.split(',').next()?.trim();
    let column = first.rsplit('.').next()?;
    if column.is_empty() || column == "id" {
        return None;
    }
    Some(snake_to_camel(column))
}

fn snake_to_camel(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut upper = false;
    for ch in column.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/* -------------------------------------------------------------------------- */
/* StorageError → TimebookError */
/* -------------------------------------------------------------------------- */

impl IntoTimebookError for StorageError {
    fn into_timebook(self) -> TimebookError {
        let retryable = self.is_retryable();
        match self {
            StorageError::Rusqlite(err) => err.into_timebook(),
            StorageError::Timeout(secs) => {
                TimebookError::Database(format!("timed out waiting {secs}s for a connection"))
            }
            StorageError::Migration(msg) => TimebookError::Database(format!("migration failed: {msg}")),
            StorageError::InvalidConfig(msg) => TimebookError::Config(msg),
            other if retryable => TimebookError::Database(format!("{other} (retryable)")),
            other => TimebookError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        let severity = value.severity();
        let retryable = value.is_retryable();
        let detail = value.to_string();
        let err = value.into_timebook();

        // Duplicates and missing rows are reported to the caller, not logged.
        if !err.is_user_error() {
            match severity {
                ErrorSeverity::Info => debug!(error = %detail, "storage error"),
                ErrorSeverity::Warning => warn!(error = %detail, retryable, "storage error"),
                ErrorSeverity::Error | ErrorSeverity::Critical => {
                    error!(error = %detail, %severity, retryable, "storage error")
                }
            }
        }
        InfraError(err)
    }
}

/// Convert a pool or query failure into the domain error.
pub fn map_storage_error(err: StorageError) -> TimebookError {
    InfraError::from(err).into()
}

/// A blocking task panicked or was cancelled.
pub fn map_join_error(err: JoinError) -> TimebookError {
    TimebookError::Internal(format!("Task join error: {err}"))
}
