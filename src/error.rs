//! Application error types

use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Serializable error response for the dashboard
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        let (code, message) = match &err {
            AppError::Serialization(_) => ("SERIALIZATION_ERROR", err.to_string()),
            AppError::Session(_) => ("SESSION_ERROR", err.to_string()),
            AppError::Validation(_) => ("VALIDATION_ERROR", err.to_string()),
            AppError::NotFound(_) => ("NOT_FOUND", err.to_string()),
            AppError::NotImplemented(_) => ("NOT_IMPLEMENTED", err.to_string()),
            AppError::Config(_) => ("CONFIG_ERROR", err.to_string()),
            AppError::Io(_) => ("IO_ERROR", err.to_string()),
            AppError::Internal(_) => ("INTERNAL_ERROR", err.to_string()),
        };

        ErrorResponse {
            status: "error".to_string(),
            code: code.to_string(),
            message,
        }
    }
}

// Allow AppError to be returned from axum handlers
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Session(_) => StatusCode::UNAUTHORIZED,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Serialization(_)
            | AppError::Config(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
