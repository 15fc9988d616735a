// Centralized error handling for the console client

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the API client and session operations.
///
/// Only `Authentication` carries a side effect (forced logout, handled inside
/// the API client); every other variant is pure reporting for the caller.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("You don't have permission to perform this action")]
    Authorization,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    Unexpected(String),
}

/// Error body shape used by the backend; either key may be present.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

impl ApiError {
    /// Classify a non-2xx status plus whatever message the body carried.
    /// 401 is classified here but its forced-logout side effect lives in the
    /// API client, which is the only caller that observes raw statuses.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        if status == 401 {
            // The backend message ("Invalid email or password") is the right
            // text on a failed login; the fallback covers expired sessions.
            return ApiError::Authentication(
                message.unwrap_or_else(|| "Your session has expired. Please log in again.".to_string()),
            );
        }

        let message = message.unwrap_or_else(|| "Request failed".to_string());

        match status {
            403 => ApiError::Authorization,
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Validation(message),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
