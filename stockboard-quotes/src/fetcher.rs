//! Price fetcher
//!
//! Runs the quote page scrape first and the chart API second. Whatever
//! happens, the caller gets a `PriceRecord` back: failures of both
//! strategies turn into an errored record instead of an error.

use std::sync::Arc;

use stockboard_core::{PriceRecord, Ticker};
use tracing::{debug, warn};

use crate::chart::{parse_chart_response, YahooChartApi};
use crate::config::QuoteSourceConfig;
use crate::error::QuoteError;
use crate::page::{parse_quote_page, YahooQuotePage};
use crate::source::{QuoteApiSource, QuotePageSource};

/// Which strategy produced a record
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Quote page parsed successfully
    Success(PriceRecord),
    /// Quote page failed, chart API succeeded
    FallbackSuccess(PriceRecord),
    /// Both strategies failed; the record is errored
    Failed(PriceRecord),
}

impl FetchOutcome {
    pub fn record(&self) -> &PriceRecord {
        match self {
            FetchOutcome::Success(r) | FetchOutcome::FallbackSuccess(r) | FetchOutcome::Failed(r) => r,
        }
    }

    pub fn into_record(self) -> PriceRecord {
        match self {
            FetchOutcome::Success(r) | FetchOutcome::FallbackSuccess(r) | FetchOutcome::Failed(r) => r,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

/// Two-step quote fetcher
#[derive(Clone)]
pub struct PriceFetcher {
    page: Arc<dyn QuotePageSource>,
    api: Arc<dyn QuoteApiSource>,
}

impl PriceFetcher {
    pub fn new(page: Arc<dyn QuotePageSource>, api: Arc<dyn QuoteApiSource>) -> Self {
        Self { page, api }
    }

    /// Fetcher backed by the real quote page and chart API
    pub fn from_config(config: &QuoteSourceConfig) -> Result<Self, QuoteError> {
        let page = YahooQuotePage::new(config)?;
        let api = YahooChartApi::new(config)?;
        Ok(Self::new(Arc::new(page), Arc::new(api)))
    }

    /// Fetch the latest record for `ticker`; never fails
    pub async fn fetch(&self, ticker: &Ticker) -> FetchOutcome {
        match self.fetch_primary(ticker).await {
            Ok(record) => return FetchOutcome::Success(record),
            Err(e) => warn!(
                "{} failed for {}: {}, trying {}",
                self.page.name(),
                ticker,
                e,
                self.api.name()
            ),
        }

        match self.fetch_fallback(ticker).await {
            Ok(record) => FetchOutcome::FallbackSuccess(record),
            Err(e) => {
                warn!("{} also failed for {}: {}", self.api.name(), ticker, e);
                FetchOutcome::Failed(PriceRecord::failed(ticker.clone()))
            }
        }
    }

    async fn fetch_primary(&self, ticker: &Ticker) -> Result<PriceRecord, QuoteError> {
        let html = self.page.fetch_quote_page(ticker).await?;
        let quote = parse_quote_page(&html)?;
        debug!("Scraped {} at {}", ticker, quote.price);
        Ok(PriceRecord::quoted(ticker.clone(), quote.price, quote.change))
    }

    async fn fetch_fallback(&self, ticker: &Ticker) -> Result<PriceRecord, QuoteError> {
        let body = self.api.fetch_chart(ticker).await?;
        let quote = parse_chart_response(&body)?;
        debug!("Chart API quoted {} at {}", ticker, quote.price);
        Ok(PriceRecord::quoted(ticker.clone(), quote.price, quote.change))
    }
}

impl std::fmt::Debug for PriceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceFetcher")
            .field("page", &self.page.name())
            .field("api", &self.api.name())
            .finish()
    }
}
