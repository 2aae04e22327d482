//! Error types for quote sources

use thiserror::Error;

/// Errors that can occur while fetching or parsing a quote
#[derive(Debug, Error)]
pub enum QuoteError {
    /// HTTP request failed before a status was received
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Source answered with a non-success status
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Response could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Response parsed but a required field was missing or empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for QuoteError {
    fn from(e: reqwest::Error) -> Self {
        QuoteError::RequestFailed(e.to_string())
    }
}
