//! Provider error types
//!
//! Transport failures are classified once, when they leave reqwest, so the
//! retry loop in `http` and the generation layer agree on what is transient.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider rate limit hit, retry after {}s", retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("provider answered HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request to provider timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("could not reach provider: {0}")]
    Network(#[source] reqwest::Error),

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<LlmError>,
    },

    /// The provider answered 200 with no candidate or choice in it
    #[error("{provider} returned no completion")]
    EmptyCompletion { provider: &'static str },

    #[error("unreadable provider response: {0}")]
    InvalidResponse(String),

    #[error("provider not configured: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e)
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Network(e)
        }
    }
}

impl LlmError {
    /// Whether the same request may succeed if sent again
    ///
    /// Rate limits are not retried here; they carry their own delay and are
    /// surfaced to the caller.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status { status, .. } => super::http::is_retryable_status(*status),
            Self::Timeout(_) | Self::Network(_) => true,
            Self::RateLimited { .. }
            | Self::RetriesExhausted { .. }
            | Self::EmptyCompletion { .. }
            | Self::InvalidResponse(_)
            | Self::Config(_)
            | Self::Json(_) => false,
        }
    }
}
