//! Completion API error classification.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the completion HTTP API, classified for retry decisions.
#[derive(Debug, Clone, Error)]
pub enum CompletionApiError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),
}

impl CompletionApiError {
    /// Classify a non-success HTTP status plus body.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::InvalidApiKey,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            s if s.is_client_error() => Self::InvalidRequest(body),
            s => Self::ServerError(s, body),
        }
    }

    /// Transient errors are worth retrying with backoff; permanent ones are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimitExceeded | Self::Timeout | Self::Network(_) => true,
            Self::ServerError(status, _) => status.is_server_error(),
            Self::InvalidApiKey | Self::InvalidRequest(_) => false,
        }
    }
}
