//! Error types for contacts API calls
//!
//! Every failed request collapses into one [`ApiError`], and every
//! [`ApiError`] has a single human-readable message suitable for printing.

use thiserror::Error;

/// Fallback shown when the server gives us nothing better to say
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// HTTP 401
    #[error("authentication required")]
    Unauthorized,

    /// HTTP 403
    #[error("access denied")]
    Forbidden,

    /// HTTP 404
    #[error("resource not found")]
    NotFound,

    /// HTTP 5xx
    #[error("server error (HTTP {0})")]
    Server(u16),

    /// Any other non-success status, with whatever message the server sent
    #[error("request failed (HTTP {status}): {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    /// The transport-level request timeout elapsed
    #[error("request timed out")]
    Timeout,

    /// Connection, DNS or other transport failure
    #[error("network error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success HTTP status together with the response body
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            500..=599 => ApiError::Server(status),
            _ => ApiError::Status {
                status,
                message: extract_server_message(body),
            },
        }
    }

    /// Message shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Authentication required. Please sign in again.".to_string(),
            ApiError::Forbidden => "Access denied. You don't have permission to do this.".to_string(),
            ApiError::NotFound => "The requested resource was not found.".to_string(),
            ApiError::Server(_) => "Server error. Please try again later.".to_string(),
            ApiError::Status { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            ApiError::Timeout => "The request timed out. Please try again.".to_string(),
            ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status code, when the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::Server(status) | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            ApiError::from_status(status.as_u16(), "")
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ".."}` and `{"error": ".."}` (or `{"error": {"message": ".."}}`),
/// falling back to a short plain-text body.
pub fn extract_server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidate = value
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| value.get("error").and_then(|e| e.as_str()))
            .or_else(|| {
                value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
            });
        return candidate
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
    }

    // HTML error pages are not worth showing
    if body.starts_with('<') || body.len() > 200 {
        return None;
    }

    Some(body.to_string())
}
