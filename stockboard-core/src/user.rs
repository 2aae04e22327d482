//! Users and their ticker watch lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::StockboardError;
use crate::ticker::Ticker;

/// Tickers every new user starts with
pub const DEFAULT_TICKERS: [&str; 3] = ["AAPL", "MSFT", "GOOGL"];

/// Opaque user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Result<Self, StockboardError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(StockboardError::InvalidUserId(raw));
        }
        Ok(UserId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = StockboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserId::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// A registered user and the tickers they follow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Followed tickers in the order they were added, no duplicates
    pub tickers: Vec<Ticker>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user at signup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

/// The default watch list for new users
pub fn default_tickers() -> Vec<Ticker> {
    DEFAULT_TICKERS
        .iter()
        .filter_map(|raw| Ticker::parse(raw).ok())
        .collect()
}

/// Append `ticker` to `tickers`, rejecting duplicates
pub fn with_ticker_added(
    user_id: &UserId,
    tickers: &[Ticker],
    ticker: Ticker,
) -> Result<Vec<Ticker>, StockboardError> {
    if tickers.contains(&ticker) {
        return Err(StockboardError::DuplicateTicker {
            user_id: user_id.to_string(),
            ticker: ticker.to_string(),
        });
    }
    let mut updated = tickers.to_vec();
    updated.push(ticker);
    Ok(updated)
}

/// Remove `ticker` from `tickers`; `None` when it is not in the list
pub fn with_ticker_removed(tickers: &[Ticker], ticker: &Ticker) -> Option<Vec<Ticker>> {
    if !tickers.contains(ticker) {
        return None;
    }
    Some(tickers.iter().filter(|t| *t != ticker).cloned().collect())
}
