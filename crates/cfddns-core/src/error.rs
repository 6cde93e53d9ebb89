//! Error types for cfddns
//!
//! Every component returns [`Result`]. The run engine matches on the variant
//! to pick the run log line and the stage the run stopped at.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cfddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cfddns
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file does not exist
    #[error("Configuration file not found: {}", .path.display())]
    ConfigNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The configuration file exists but its content is unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O errors outside the run log
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The run log could not be written
    #[error("Failed to write log file {}: {source}", .path.display())]
    Log {
        /// Path of the run log
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// Connection-level failure (DNS resolution, refused, reset, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-2xx response that has no more specific variant
    #[error("HTTP {status} from {url}: {detail}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Request URL
        url: String,
        /// Response summary
        detail: String,
    },

    /// 401 or 403 from the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// 429 from the provider
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 2xx response whose body does not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider answered with `success: false`
    #[error("API error: {0}")]
    Api(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a provider API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Map a non-2xx HTTP status to the matching variant
    ///
    /// `detail` is whatever the caller could extract from the response body.
    pub fn from_status(status: u16, url: impl Into<String>, detail: impl Into<String>) -> Self {
        let url = url.into();
        let detail = detail.into();
        match status {
            401 | 403 => Self::Authentication(format!(
                "invalid API token or insufficient permissions (HTTP {status} from {url}): {detail}"
            )),
            429 => Self::RateLimited(format!("HTTP {status} from {url}: {detail}")),
            _ => Self::Status {
                status,
                url,
                detail,
            },
        }
    }

    /// Whether this error is a missing-record condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
