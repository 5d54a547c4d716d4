//! Error types and error handling for the application
//!
//! This module defines the error taxonomy and its conversion to HTTP
//! responses. Service errors are a closed set of variants so the status
//! mapping in `IntoResponse` is total; validation errors carry the full
//! list of field-level problems.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Errors produced by service-layer functions.
///
/// Services never see HTTP types; each variant is mapped to a fixed status
/// code by the dispatcher.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is well-formed but violates a business rule
    /// (e.g. the path exists but is not a directory)
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A dependency the service needs is not usable
    #[error("unavailable: {0}")]
    Unavailable(String),
}

/// One field-level problem found while validating a request payload
#[derive(Debug, Clone, Serialize)]
pub struct FieldProblem {
    /// Name of the offending field (`body` for payloads that fail to decode)
    pub field: String,
    /// Human-readable description of the violation
    pub message: String,
}

/// A request payload that failed schema validation.
///
/// Carries every violated field, not just the first one found.
#[derive(Debug, Error)]
#[error("validation failed: {} problem(s)", .problems.len())]
pub struct ValidationError {
    /// All field-level problems detected in the payload
    pub problems: Vec<FieldProblem>,
}

impl ValidationError {
    /// A single body-level problem, used when the payload cannot be decoded
    /// at all (malformed JSON, missing field, wrong type).
    pub fn body(message: impl Into<String>) -> Self {
        Self {
            problems: vec![FieldProblem {
                field: "body".to_string(),
                message: message.into(),
            }],
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut problems = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("constraint violated: {}", error.code));
                problems.push(FieldProblem {
                    field: field.to_string(),
                    message,
                });
            }
        }
        Self { problems }
    }
}

/// Application-level error type seen by the dispatcher.
///
/// Every handler returns `Result<_, AppError>`; the `IntoResponse`
/// implementation below is the single place where errors become HTTP
/// status codes and bodies.
#[derive(Debug, Error)]
pub enum AppError {
    /// A service function reported a failure
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request payload failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Unexpected internal failure (never exposed to the caller)
    #[error("internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Service(ServiceError::NotFound(detail)) => (
                StatusCode::NOT_FOUND,
                json!({ "status": "not_found", "detail": detail }),
            ),
            AppError::Service(ServiceError::InvalidState(detail)) => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "invalid_state", "detail": detail }),
            ),
            AppError::Service(ServiceError::Unavailable(detail)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "status": "unavailable", "detail": detail }),
            ),
            AppError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "status": "invalid", "detail": err.problems }),
            ),
            AppError::Internal(err) => {
                tracing::error!("internal error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "status": "error", "detail": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_service_error_status_mapping() {
        assert_eq!(
            status_of(ServiceError::NotFound("x".into()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::InvalidState("x".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Unavailable("x".into()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_error_is_client_error() {
        let err = AppError::Validation(ValidationError::body("expected value"));
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_internal_error_is_server_error() {
        let err = AppError::Internal(anyhow::anyhow!("secret database password leaked"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_error_collects_all_problems() {
        let err = ValidationError {
            problems: vec![
                FieldProblem {
                    field: "path".to_string(),
                    message: "path must not be empty".to_string(),
                },
                FieldProblem {
                    field: "page_size".to_string(),
                    message: "page_size must be at least 1".to_string(),
                },
            ],
        };
        assert_eq!(err.problems.len(), 2);
        assert!(err.to_string().contains("2 problem(s)"));
    }
}
