//! Quote sources for Stockboard
//!
//! This crate provides:
//! - Quote page scraping: structural parse of a public quote page (primary)
//! - Chart API: structured quote JSON endpoint (fallback)
//! - `PriceFetcher`: runs the two strategies in order and always yields a record

pub mod chart;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod page;
pub mod source;

pub use chart::{parse_chart_response, ChartQuote, YahooChartApi};
pub use config::QuoteSourceConfig;
pub use error::QuoteError;
pub use fetcher::{FetchOutcome, PriceFetcher};
pub use page::{parse_price, parse_quote_page, PageQuote, YahooQuotePage};
pub use source::{QuoteApiSource, QuotePageSource};
