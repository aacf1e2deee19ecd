use thiserror::Error;

use crate::venice::VeniceError;

/// Run-level error taxonomy.
///
/// Every recognized failure a stage can hit maps onto one of these categories
/// so the HTTP layer can pick a status code and a human-readable message.
/// `ParseFailure` exists in the taxonomy but the text stage degrades instead
/// of surfacing it as a hard failure.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Missing or contradictory request fields. Surfaced as HTTP 400.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("request timed out")]
    Timeout,

    /// Malformed provider response. Degraded, not fatal, for the text stage.
    #[error("failed to parse provider response: {0}")]
    ParseFailure(String),

    /// Anything uncaught. Surfaced as HTTP 500 with a generic message.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl WorkflowError {
    /// Whether this category should surface as a 500 rather than a 4xx.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, WorkflowError::Unexpected(_))
    }
}

impl From<VeniceError> for WorkflowError {
    fn from(err: VeniceError) -> Self {
        match err {
            VeniceError::AuthFailed(msg) => WorkflowError::AuthFailure(msg),
            VeniceError::PaymentRequired(msg) => WorkflowError::QuotaExceeded(msg),
            VeniceError::RateLimited { retry_after_ms } => {
                WorkflowError::RateLimited { retry_after_ms }
            }
            VeniceError::Unavailable { status, message } => {
                WorkflowError::ProviderUnavailable(format!("status {status}: {message}"))
            }
            VeniceError::ApiError { status, message } => {
                WorkflowError::ProviderUnavailable(format!("status {status}: {message}"))
            }
            VeniceError::Timeout => WorkflowError::Timeout,
            VeniceError::NetworkError(msg) => WorkflowError::NetworkError(msg),
        }
    }
}
