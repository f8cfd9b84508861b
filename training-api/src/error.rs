//! Error types for training-api
//!
//! Every client-facing failure carries a symbolic error code from
//! [`crate::error_codes`]. Codes are chosen where the failure is detected;
//! this module only maps them to HTTP statuses and bodies.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, error, info};
use training_common::api::{ErrorResponse, ValidationErrorResponse};

use crate::error_codes;

/// Field name → error code, in field-name order
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

/// Code returned when the token is missing or rejected
pub const UNAUTHORIZED_CODE: &str = "training_auth_001";

/// Code returned when the body is not a JSON object
pub const MALFORMED_BODY_CODE: &str = "training_request_001";

/// Code returned for unexpected server-side failures
pub const INTERNAL_CODE: &str = "training_internal_001";

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more fields failed validation (400)
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// Request-level input error (400)
    #[error("Invalid request: {0}")]
    BadRequest(&'static str),

    /// Missing or rejected credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Tenant-scope violation or blocked state change (403)
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    /// Record not found by id (404)
    #[error("Resource not found: {0}")]
    NotFound(&'static str),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// training-common error (500)
    #[error("Common error: {0}")]
    Common(#[from] training_common::Error),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(MALFORMED_BODY_CODE)
    }
}

fn error_body(code: &str) -> ErrorResponse {
    ErrorResponse::new(code, error_codes::detail(code))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                let body = ValidationErrorResponse {
                    errors: errors
                        .into_iter()
                        .map(|(field, code)| (field.to_string(), error_body(code)))
                        .collect(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::BadRequest(code) => {
                (StatusCode::BAD_REQUEST, Json(error_body(code))).into_response()
            }
            ApiError::Unauthorized(reason) => {
                debug!("Unauthorized request: {}", reason);
                (StatusCode::UNAUTHORIZED, Json(error_body(UNAUTHORIZED_CODE))).into_response()
            }
            ApiError::Forbidden(code) => {
                info!(code, "Permission denied");
                (StatusCode::FORBIDDEN, Json(error_body(code))).into_response()
            }
            ApiError::NotFound(code) => {
                (StatusCode::NOT_FOUND, Json(error_body(code))).into_response()
            }
            ApiError::Database(ref err) => internal_response(&err.to_string()),
            ApiError::Common(ref err) => internal_response(&err.to_string()),
            ApiError::Internal(ref msg) => internal_response(msg),
        }
    }
}

fn internal_response(message: &str) -> Response {
    error!("Internal error: {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(error_body(INTERNAL_CODE)),
    )
        .into_response()
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
