//! Error types for supply-risk-core

use thiserror::Error;

/// Failures of a primary signal source.
///
/// These are always recovered inside a provider by switching to the
/// fallback store; they never escape a pipeline cycle.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Transport-level HTTP failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Non-2xx response status
    #[error("unexpected HTTP status: {status}")]
    Status { status: u16 },

    /// Response body did not have the expected structure
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Source declined to produce a value
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if let Some(status) = err.status() {
            SourceError::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            SourceError::Malformed(err.to_string())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Malformed(err.to_string())
    }
}

/// Result type for source fetches.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Setup-time errors: building a pipeline, loading a dataset, parsing config.
#[derive(Error, Debug)]
pub enum SupplyRiskError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("rotation '{name}' must contain at least one entry")]
    EmptyRotation { name: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for setup operations.
pub type Result<T> = std::result::Result<T, SupplyRiskError>;
