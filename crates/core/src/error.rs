//! Error types for the CareerPath domain.
//!
//! Uses `thiserror` for ergonomic error definitions. `ProviderError` describes
//! what went wrong talking to an AI backend; `Error` is the taxonomy the
//! advisor surfaces and the gateway maps onto HTTP statuses.

use thiserror::Error;

/// The top-level error type for advisor operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller-supplied input was malformed (wrong answer count, missing message).
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The provider was overloaded or rate limited and retries ran out.
    #[error("AI service temporarily unavailable: {0}")]
    TransientService(ProviderError),

    /// Any other provider failure. Never retried.
    #[error("AI service error: {0}")]
    PermanentService(ProviderError),

    /// The model answered, but not with a usable recommendation.
    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ProviderError> for Error {
    fn from(err: ProviderError) -> Self {
        match err.status_code() {
            Some(429) | Some(503) => Error::TransientService(err),
            _ => Error::PermanentService(err),
        }
    }
}

impl Error {
    /// Whether the client may resubmit the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Validation(_) => false,
            Error::TransientService(_) | Error::PermanentService(_) | Error::MalformedResponse(_) => {
                true
            }
        }
    }
}

// --- Provider errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unreadable provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// The HTTP status this failure carries, if any.
    ///
    /// Transport-level failures, missing credentials, and unreadable bodies
    /// have no status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::ApiError { status_code, .. } => Some(*status_code),
            ProviderError::RateLimited { .. } => Some(429),
            ProviderError::Unavailable(_) => Some(503),
            ProviderError::AuthenticationFailed(_) => Some(401),
            ProviderError::NotConfigured(_)
            | ProviderError::InvalidResponse(_)
            | ProviderError::Timeout(_)
            | ProviderError::Network(_) => None,
        }
    }

    /// Whether an unchanged retry might succeed.
    ///
    /// A status other than 503/429 is permanent. A failure without a status is
    /// transient, except a missing credential or an unreadable body, which the
    /// same request would reproduce.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::NotConfigured(_) | ProviderError::InvalidResponse(_) => false,
            other => match other.status_code() {
                Some(code) => code == 429 || code == 503,
                None => true,
            },
        }
    }
}
