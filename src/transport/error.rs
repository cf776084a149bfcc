use thiserror::Error;

/// Transport-layer error types: unified encapsulation of HTTP and JSON
/// errors raised by the concrete transport implementation. These are
/// normalized into `crate::types::error::PipelineError` by the dispatcher
/// (§7 of the pipeline spec) — never by interceptors.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("authentication failed: {0}")]
    AuthenticationError(String),

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    #[error("connect timeout: {0}")]
    ConnectTimeout(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("bad certificate: {0}")]
    BadCertificate(String),
}

impl TransportError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded,
            400..=499 => Self::ClientError { status, message },
            500..=599 => Self::ServerError { status, message },
            _ => Self::InvalidUrl(format!("unexpected status code: {}", status)),
        }
    }

    /// Whether this transport-level failure is generally safe to retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::HttpError(e) => e.is_timeout() || e.is_connect(),
            TransportError::ClientError { status, .. } => {
                matches!(status, 429 | 502 | 503 | 504)
            }
            TransportError::ServerError { .. }
            | TransportError::ConnectTimeout(_)
            | TransportError::Timeout(_)
            | TransportError::RateLimitExceeded => true,
            _ => false,
        }
    }
}
