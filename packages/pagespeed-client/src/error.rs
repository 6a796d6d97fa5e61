//! Error types for the PageSpeed client.

use thiserror::Error;

/// Result type for PageSpeed client operations.
pub type Result<T> = std::result::Result<T, PageSpeedError>;

/// PageSpeed client errors.
#[derive(Debug, Error)]
pub enum PageSpeedError {
    /// Configuration error (unparseable endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the API
    #[error("PageSpeed API error: {status}")]
    Api { status: u16, message: String },

    /// The API answered 200 but reported an error in the body
    #[error("{0}")]
    Rejected(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response carried neither an error nor a Lighthouse result
    #[error("No Lighthouse result returned")]
    NoResult,
}

impl From<reqwest::Error> for PageSpeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PageSpeedError::Parse(e.to_string())
        } else {
            PageSpeedError::Network(e.to_string())
        }
    }
}
