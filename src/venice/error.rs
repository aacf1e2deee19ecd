//! Error types for the Venice.ai API client.
//!
//! [`VeniceError`] classifies transport-level failures by their HTTP status
//! semantics so the pipeline can surface a distinct, user-facing category for
//! each: 401 auth, 402 payment, 429 rate limit, 5xx transient, plus timeouts
//! and network failures from the underlying `reqwest` layer.

use thiserror::Error;

/// Failures that can occur while talking to the Venice.ai API.
#[derive(Debug, Error)]
pub enum VeniceError {
    /// HTTP 401 — the API key was rejected.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// HTTP 402 — the account is out of credit.
    #[error("payment required: {0}")]
    PaymentRequired(String),

    /// HTTP 429. `retry_after_ms` comes from the `retry-after` header when present.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// HTTP 5xx — the provider is having a bad time.
    #[error("provider unavailable (status {status}): {message}")]
    Unavailable { status: u16, message: String },

    /// Any other non-success HTTP status.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Underlying network failure (DNS, connection refused, TLS).
    #[error("network error: {0}")]
    NetworkError(String),
}

impl From<reqwest::Error> for VeniceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VeniceError::Timeout
        } else {
            VeniceError::NetworkError(err.to_string())
        }
    }
}

impl VeniceError {
    /// Classify a non-success HTTP status with its response body.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => VeniceError::AuthFailed(message),
            402 => VeniceError::PaymentRequired(message),
            500..=599 => VeniceError::Unavailable { status, message },
            _ => VeniceError::ApiError { status, message },
        }
    }
}
