//! HTTP error mapping
//!
//! Every failure leaves the server as
//! `{"error": {"code": .., "message": ..}}`; validation failures also list
//! the offending fields.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use salary_common::{SubmitError, ValidationError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Submission failed field validation (422)
    #[error("{0}")]
    Validation(ValidationError),

    /// Record could not be stored (500)
    #[error("Failed to save submission: {0}")]
    Persistence(String),

    /// salary-common error
    #[error("Common error: {0}")]
    Common(#[from] salary_common::Error),
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(e) => ApiError::Validation(e),
            SubmitError::Persistence(msg) => ApiError::Persistence(msg),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Validation(e) => {
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION_FAILED",
                        "message": e.to_string(),
                        "missing_fields": e.missing,
                        "invalid_fields": e.invalid,
                    }
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            ApiError::Persistence(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_FAILED",
                msg.clone(),
            ),
            ApiError::Common(salary_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            ApiError::Common(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                err.to_string(),
            ),
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
