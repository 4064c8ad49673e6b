//! Application error type and its HTTP representation.
//!
//! Every error returned by a handler becomes a JSON envelope:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Link not found", "details": {} } }
//! ```
//!
//! Store and driver errors are logged where they happen and never copied into
//! `details`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::errors::{AllocationError, DispatchError, StoreError};
use crate::utils::url_validator::UrlValidationError;

pub const INVALID_CODE_MESSAGE: &str =
    "Code must be 6-8 characters and contain only letters and numbers";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL format. Must be http:// or https://";
pub const LINK_NOT_FOUND_MESSAGE: &str = "Link not found";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Error returned by services and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    Unavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// The plain "link not found" error used for every failed visit.
    pub fn link_not_found() -> Self {
        Self::not_found(LINK_NOT_FOUND_MESSAGE, json!({}))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Unavailable { message, details } => {
                ("service_unavailable", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation { constraint } => AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": constraint }),
            ),
            StoreError::Backend(source) => {
                tracing::error!(error = %source, "Store operation failed");
                AppError::internal("Database error", json!({}))
            }
        }
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::InvalidFormat { code } => {
                AppError::bad_request(INVALID_CODE_MESSAGE, json!({ "code": code }))
            }
            AllocationError::CodeConflict { code } => {
                AppError::conflict("Code already exists", json!({ "code": code }))
            }
            AllocationError::AllocationExhausted { attempts } => AppError::unavailable(
                "Failed to generate unique code. Please try again.",
                json!({ "attempts": attempts }),
            ),
            AllocationError::Store(store) => store.into(),
        }
    }
}

/// Every dispatch failure looks the same to the visitor.
impl From<DispatchError> for AppError {
    fn from(_: DispatchError) -> Self {
        AppError::link_not_found()
    }
}

impl From<UrlValidationError> for AppError {
    fn from(err: UrlValidationError) -> Self {
        match err {
            UrlValidationError::Missing => {
                AppError::bad_request("targetUrl is required", json!({}))
            }
            UrlValidationError::InvalidFormat(reason) => {
                AppError::bad_request(INVALID_URL_MESSAGE, json!({ "reason": reason }))
            }
            UrlValidationError::UnsupportedProtocol => AppError::bad_request(
                INVALID_URL_MESSAGE,
                json!({ "reason": "unsupported protocol" }),
            ),
            UrlValidationError::UnsafeCharacters => AppError::bad_request(
                INVALID_URL_MESSAGE,
                json!({ "reason": "control characters or surrounding whitespace" }),
            ),
        }
    }
}

/// Malformed or mistyped JSON bodies. The serde message is logged, not returned.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");

        let message = match &rejection {
            JsonRejection::JsonDataError(err) => mistyped_field_message(&err.body_text()),
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`"
            }
            _ => "Invalid request body",
        };

        AppError::bad_request(message, json!({}))
    }
}

fn mistyped_field_message(body_text: &str) -> &'static str {
    if body_text.contains(": code: ") {
        "Code must be a string"
    } else if body_text.contains(": targetUrl: ") {
        "targetUrl must be a string"
    } else {
        "Invalid request body"
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected query string");
        AppError::bad_request("Invalid query parameters", json!({}))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid request".to_string());

        let details = serde_json::to_value(&errors).unwrap_or_default();

        AppError::bad_request(message, details)
    }
}
