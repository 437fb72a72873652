// Error handling module for the Notes API
// Domain errors report an ErrorKind; this module maps kinds to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::auth::AuthError;
use crate::notes::NoteError;

/// Transport-independent classification of every failure the service reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationFailed,
    Internal,
}

/// Main error type for the HTTP layer
/// All handlers return Result<T, ApiError>
#[derive(Debug)]
pub enum ApiError {
    /// Field-level failures from request DTO validation
    ValidationError(validator::ValidationErrors),

    /// Invalid input reported by a domain component
    InvalidInput(String),

    NotFound(String),

    Conflict(String),

    /// Authentication failures. The message is already client-safe.
    Unauthorized(String),

    /// Authorization failures
    Forbidden(String),

    /// Internal failures. The detail is logged, never sent to clients.
    InternalError(String),
}

/// Consistent error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g. "VALIDATION_ERROR", "NOT_FOUND")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional field-level details, omitted from JSON when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::ValidationError(_) | ApiError::InvalidInput(_) => ErrorKind::ValidationFailed,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Conflict(_) => ErrorKind::Conflict,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Forbidden(_) => ErrorKind::Forbidden,
            ApiError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        status_for(self.kind())
    }

    /// Build a client-facing response, logging at a level matching severity.
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        let response = match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                ErrorResponse {
                    details: Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({}))),
                    ..ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                }
            }
            ApiError::InvalidInput(message) => {
                debug!("Invalid input: {}", message);
                ErrorResponse::new("VALIDATION_ERROR", message.clone())
            }
            ApiError::NotFound(message) => {
                debug!("Resource not found: {}", message);
                ErrorResponse::new("NOT_FOUND", message.clone())
            }
            ApiError::Conflict(message) => {
                warn!("Conflict error: {}", message);
                ErrorResponse::new("CONFLICT", message.clone())
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized request: {}", message);
                ErrorResponse::new("UNAUTHORIZED", message.clone())
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                ErrorResponse::new("FORBIDDEN", message.clone())
            }
            ApiError::InternalError(detail) => {
                error!("Internal error: {}", detail);
                ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred")
            }
        };

        (status, response)
    }

    /// Map a domain failure onto the transport error for its kind.
    /// `detail` is only used for internal errors, where it is logged.
    fn from_domain(kind: ErrorKind, public_message: String, detail: String) -> Self {
        match kind {
            ErrorKind::Conflict => ApiError::Conflict(public_message),
            ErrorKind::Unauthorized => ApiError::Unauthorized(public_message),
            ErrorKind::Forbidden => ApiError::Forbidden(public_message),
            ErrorKind::NotFound => ApiError::NotFound(public_message),
            ErrorKind::ValidationFailed => ApiError::InvalidInput(public_message),
            ErrorKind::Internal => ApiError::InternalError(detail),
        }
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::from_domain(err.kind(), err.public_message().to_string(), err.to_string())
    }
}

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        ApiError::from_domain(err.kind(), err.to_string(), err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}
