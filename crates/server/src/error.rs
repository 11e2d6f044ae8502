//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is written; clients only see a
//! generic message for those.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::settings::SettingsError;

/// Message returned with every 403.
pub const FORBIDDEN_MESSAGE: &str = "Sorry, you are not allowed to do that.";

/// Message returned with every 404.
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";

/// Application-level error type for the HTTP surface.
#[derive(Debug, Error)]
pub enum AppError {
    /// Settings could not be read or written.
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Caller lacks the admin token.
    #[error("Forbidden")]
    Forbidden,

    /// Resource not found.
    #[error("Not found")]
    NotFound,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Settings(SettingsError::InvalidUrl(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Settings(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = match &self {
            Self::Forbidden => json!({
                "code": "rest_forbidden",
                "message": FORBIDDEN_MESSAGE,
                "data": { "status": status.as_u16() },
            }),
            Self::NotFound => json!({
                "error": "not_found",
                "message": NOT_FOUND_MESSAGE,
            }),
            Self::BadRequest(message) => json!({
                "error": "bad_request",
                "message": message,
            }),
            Self::Settings(SettingsError::InvalidUrl(message)) => json!({
                "error": "invalid_url",
                "message": message,
            }),
            // Don't expose internal error details to clients
            Self::Settings(_) | Self::Internal(_) => json!({
                "error": "internal_error",
                "message": "Internal server error",
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
