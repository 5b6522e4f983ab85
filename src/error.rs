//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::Envelope;
use crate::store::StoreError;

pub const NOT_FOUND_MESSAGE: &str = "Student not found";
pub const EMAIL_CONFLICT_MESSAGE: &str = "A student with this email already exists";
pub const INVALID_DATA_MESSAGE: &str = "Invalid data";
pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body is too large";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid bind address: {0}")]
    Address(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid data")]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("Request body is too large")]
    PayloadTooLarge,
    #[error("{context}: {message}")]
    Unexpected { context: &'static str, message: String },
}

impl AppError {
    pub fn not_found() -> Self {
        AppError::NotFound(NOT_FOUND_MESSAGE.into())
    }

    /// Translate a data-access failure for a write. Every unique violation is
    /// reported as an email collision, including enrollment-code races.
    pub fn from_write(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { constraint } => {
                tracing::warn!(%constraint, "unique constraint violated");
                AppError::Conflict(EMAIL_CONFLICT_MESSAGE.into())
            }
            other => AppError::unexpected(context, other),
        }
    }

    pub fn unexpected(context: &'static str, err: impl std::fmt::Display) -> Self {
        AppError::Unexpected {
            context,
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = match self {
            AppError::Validation(details) => Envelope::failure_with_details(INVALID_DATA_MESSAGE, details),
            other => Envelope::failure(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
