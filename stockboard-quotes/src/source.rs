//! Outbound quote capabilities
//!
//! The fetcher only sees these traits, so tests can swap in canned
//! responses instead of hitting the network.

use async_trait::async_trait;
use stockboard_core::Ticker;

use crate::error::QuoteError;

/// Fetches the HTML quote page for a ticker
#[async_trait]
pub trait QuotePageSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Return the raw HTML of the quote page
    async fn fetch_quote_page(&self, ticker: &Ticker) -> Result<String, QuoteError>;
}

/// Fetches structured quote JSON for a ticker
#[async_trait]
pub trait QuoteApiSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Return the raw JSON body of the chart endpoint
    async fn fetch_chart(&self, ticker: &Ticker) -> Result<String, QuoteError>;
}
