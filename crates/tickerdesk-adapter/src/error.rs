/*
[INPUT]:  Error sources (HTTP, API, serialization, cancellation)
[OUTPUT]: Structured error types with classification helpers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing classification rules
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the dashboard backend adapter
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Request was cancelled before it completed
    #[error("request cancelled")]
    Cancelled,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether this error signals cooperative cancellation rather than a
    /// real failure. Cancellations must never surface as user-visible
    /// errors.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }

    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Http(_) | ClientError::InvalidResponse(_) => true,
            ClientError::Api { code, .. } => *code >= 500,
            _ => false,
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        ClientError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, ClientError>;
