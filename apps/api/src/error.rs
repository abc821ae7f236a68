//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Handler                                                                │
//! │  Result<Json<T>, ApiError>                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  EngineError::Domain(NotFound)            ── 404 NOT_FOUND              │
//! │  EngineError::Domain(Validation)          ── 400 VALIDATION_ERROR       │
//! │                                              400 INVALID_AMOUNT         │
//! │  EngineError::Domain(InsufficientStock)   ── 422 INSUFFICIENT_STOCK     │
//! │  EngineError::Domain(NoRateConfigured)    ── 422 NO_RATE_CONFIGURED     │
//! │  EngineError::Domain(InvalidPaymentTarget)── 422 INVALID_PAYMENT_TARGET │
//! │  EngineError::Storage(_)                  ── 500 DATABASE_ERROR         │
//! │                                              (logged, message masked)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use shoebox_core::{CoreError, ValidationError};
use shoebox_engine::EngineError;

/// Error body returned by every failing request.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for shoe-a size 42: available 7, requested 8",
///   "details": { "available": 7, "requested": 8 }
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Malformed input (400)
    ValidationError,

    /// Non-positive or out-of-range amount (400)
    InvalidAmount,

    /// Sale would oversell a variant (422)
    InsufficientStock,

    /// Sale attempted before any rate was recorded (422)
    NoRateConfigured,

    /// Payment linked to a purchase it cannot settle (422)
    InvalidPaymentTarget,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InvalidAmount => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock
            | ErrorCode::NoRateConfigured
            | ErrorCode::InvalidPaymentTarget => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, message),
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => ApiError::new(ErrorCode::InsufficientStock, message)
                .with_details(json!({ "available": available, "requested": requested })),
            CoreError::NoRateConfigured => ApiError::new(ErrorCode::NoRateConfigured, message),
            CoreError::InvalidPaymentTarget { .. } => {
                ApiError::new(ErrorCode::InvalidPaymentTarget, message)
            }
            CoreError::Validation(ValidationError::InvalidAmount { .. }) => {
                ApiError::new(ErrorCode::InvalidAmount, message)
            }
            CoreError::Validation(_) => ApiError::validation(message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        CoreError::Validation(err).into()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Domain(err) => err.into(),
            EngineError::Storage(err) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %err, "Storage operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;
