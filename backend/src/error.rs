//! Error handling for the Fabric Roll Tracking Platform
//!
//! Provides consistent JSON error responses with stable machine codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Allocation and reconciliation errors
    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    #[error("Serial allocation exhausted for scope {scope}")]
    AllocationExhausted { scope: String },

    #[error("Malformed label: {line}")]
    MalformedLabel { line: String },

    #[error("Dispatch manifest is empty")]
    EmptyDispatch,

    #[error("Unit {0} has been dispatched and can no longer be modified")]
    UnitConsumed(String),

    // External service errors
    #[error("QR encoder error: {0}")]
    QrEncoder(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid username or password".to_string(),
                    field: None,
                },
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message: "Token has expired".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message: "Invalid token".to_string(),
                    field: None,
                },
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "INSUFFICIENT_PERMISSIONS".to_string(),
                    message: "You do not have permission to perform this action".to_string(),
                    field: None,
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::InvalidShift(shift) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_SHIFT".to_string(),
                    message: format!("Unknown shift value: {}", shift),
                    field: Some("shift".to_string()),
                },
            ),
            AppError::AllocationExhausted { scope } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "ALLOCATION_EXHAUSTED".to_string(),
                    message: format!(
                        "No serial could be allocated for scope {}; retry with backoff",
                        scope
                    ),
                    field: None,
                },
            ),
            AppError::MalformedLabel { line } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "MALFORMED_LABEL".to_string(),
                    message: format!("Label does not match the expected grammar: {}", line),
                    field: Some("lines".to_string()),
                },
            ),
            AppError::EmptyDispatch => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "EMPTY_DISPATCH".to_string(),
                    message: "A dispatch requires at least one label line".to_string(),
                    field: Some("lines".to_string()),
                },
            ),
            AppError::UnitConsumed(code) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "UNIT_CONSUMED".to_string(),
                    message: format!("Unit {} has already been dispatched", code),
                    field: None,
                },
            ),
            AppError::QrEncoder(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "QR_ENCODER_ERROR".to_string(),
                    message: format!("QR encoder error: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
