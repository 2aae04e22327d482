//! Error types shared across Stockboard crates

use thiserror::Error;

/// Workspace-wide error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StockboardError {
    #[error("Invalid ticker symbol: {0}")]
    InvalidTicker(String),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),

    #[error("Ticker {ticker} is already in the list for user {user_id}")]
    DuplicateTicker { user_id: String, ticker: String },
}

impl StockboardError {
    pub fn invalid_ticker(raw: impl Into<String>) -> Self {
        StockboardError::InvalidTicker(raw.into())
    }
}

/// Result type alias for core operations
pub type StockboardResult<T> = Result<T, StockboardError>;
