//! HTTP rendering of domain errors
//!
//! User errors are echoed back with their message and field details.
//! Everything else is logged in full and answered with an opaque 500.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use timebook_domain::TimebookError;
use tracing::{debug, error, info};

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError(pub TimebookError);

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl ApiError {
    /// HTTP status for the wrapped error
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            TimebookError::Validation { .. }
            | TimebookError::Duplicate { .. }
            | TimebookError::NotFound(_) => StatusCode::BAD_REQUEST,
            TimebookError::Auth(_) => StatusCode::UNAUTHORIZED,
            TimebookError::Forbidden(_) => StatusCode::FORBIDDEN,
            TimebookError::Integrity(_)
            | TimebookError::Database(_)
            | TimebookError::Config(_)
            | TimebookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match &self.0 {
            err if err.is_user_error() => {
                ErrorBody { error: err.to_string(), fields: err.fields() }
            }
            TimebookError::Auth(message) | TimebookError::Forbidden(message) => {
                ErrorBody { error: message.clone(), fields: None }
            }
            _ => ErrorBody { error: INTERNAL_MESSAGE.to_string(), fields: None },
        }
    }
}

impl From<TimebookError> for ApiError {
    fn from(value: TimebookError) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(TimebookError::validation(format!("Invalid request body: {}", rejection.body_text())))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(TimebookError::validation(format!("Invalid query: {}", rejection.body_text())))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match status {
            StatusCode::BAD_REQUEST => debug!(error = %self.0, "Request rejected"),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                info!(status = status.as_u16(), error = %self.0, "Access denied");
            }
            _ => error!(error = %self.0, "Request failed"),
        }

        (status, Json(self.body())).into_response()
    }
}

/// Handler result
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (TimebookError::validation("Missing startDate"), StatusCode::BAD_REQUEST),
            (TimebookError::Duplicate { field: "name".into() }, StatusCode::BAD_REQUEST),
            (TimebookError::not_found("Report"), StatusCode::BAD_REQUEST),
            (TimebookError::Auth("Invalid or expired token".into()), StatusCode::UNAUTHORIZED),
            (TimebookError::Forbidden("Admin only".into()), StatusCode::FORBIDDEN),
            (TimebookError::Integrity("dangling".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (TimebookError::Database("locked".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status_code(), expected);
        }
    }

    #[test]
    fn system_errors_are_opaque() {
        let body = ApiError(TimebookError::Database("disk I/O error at /var/db".into())).body();
        assert_eq!(body.error, INTERNAL_MESSAGE);
        assert!(body.fields.is_none());
    }

    #[test]
    fn user_errors_keep_fields() {
        let body = ApiError(TimebookError::field("startTime", "must be HH:MM")).body();
        assert_eq!(body.error, "startTime must be HH:MM");
        assert_eq!(body.fields.unwrap()["startTime"], "must be HH:MM");

        let json = serde_json::to_value(
            ApiError(TimebookError::validation("Month must be between 1 and 12!")).body(),
        )
        .unwrap();
        assert!(json.get("fields").is_none());
    }
}
