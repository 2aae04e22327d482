//! Quote page scraping (primary strategy)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};
use stockboard_core::Ticker;
use tracing::{debug, instrument};

use crate::config::{QuoteSourceConfig, BROWSER_USER_AGENT};
use crate::error::QuoteError;
use crate::source::QuotePageSource;

/// Selector for the element holding the last price
const PRICE_SELECTOR: &str = r#"[data-test="qsp-price"]"#;

/// Selector for the element holding the change text
const CHANGE_SELECTOR: &str = r#"[data-test="qsp-price-change"]"#;

/// Values scraped from a quote page
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuote {
    pub price: f64,
    pub change: String,
}

/// Quote page client for finance.yahoo.com
#[derive(Debug, Clone)]
pub struct YahooQuotePage {
    client: Client,
    base_url: String,
}

impl YahooQuotePage {
    pub fn new(config: &QuoteSourceConfig) -> Result<Self, QuoteError> {
        Self::with_base_url(&config.page_base_url, config.page_timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(browser_headers())
            .build()
            .map_err(|e| QuoteError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QuotePageSource for YahooQuotePage {
    fn name(&self) -> &'static str {
        "quote-page"
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn fetch_quote_page(&self, ticker: &Ticker) -> Result<String, QuoteError> {
        let url = format!("{}/{}", self.base_url, ticker);
        debug!("Fetching quote page: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(QuoteError::ApiError {
                status: status.as_u16(),
                message: format!("quote page returned {}", status),
            });
        }

        let html = response.text().await?;
        debug!("Received {} bytes for {}", html.len(), ticker);
        Ok(html)
    }
}

/// Header set that gets past the quote page's bot filtering
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}

/// Extract price and change from a quote page
///
/// The price must be present and numeric; the change text is taken as-is
/// (trimmed) and may be empty.
pub fn parse_quote_page(html: &str) -> Result<PageQuote, QuoteError> {
    let document = Html::parse_document(html);

    let price_text = select_text(&document, PRICE_SELECTOR)?;
    if price_text.is_empty() {
        return Err(QuoteError::MissingField("price"));
    }
    let price = parse_price(&price_text)?;

    let change = select_text(&document, CHANGE_SELECTOR)?;

    Ok(PageQuote { price, change })
}

/// Trimmed text of the first element matching `selector`, empty if none
fn select_text(document: &Html, selector: &str) -> Result<String, QuoteError> {
    let selector = Selector::parse(selector)
        .map_err(|e| QuoteError::ParseError(format!("Invalid selector {}: {:?}", selector, e)))?;

    Ok(document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default())
}

/// Parse a displayed price such as `"1,234.56"`
///
/// Thousands separators are stripped. Empty, malformed or non-finite text
/// is an error.
pub fn parse_price(text: &str) -> Result<f64, QuoteError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(QuoteError::MissingField("price"));
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|_| QuoteError::ParseError(format!("Malformed price: {:?}", text)))?;

    if !value.is_finite() {
        return Err(QuoteError::ParseError(format!("Non-finite price: {:?}", text)));
    }

    Ok(value)
}
