//! Endpoint and timeout settings for the quote sources

use std::time::Duration;

/// Quote page URL prefix; the ticker is appended
pub const QUOTE_PAGE_BASE: &str = "https://finance.yahoo.com/quote";

/// Chart API URL prefix; the ticker is appended
pub const CHART_API_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Browser user agent; the quote page rejects generic clients
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Configuration for the outbound quote sources
#[derive(Debug, Clone)]
pub struct QuoteSourceConfig {
    pub page_base_url: String,
    pub page_timeout: Duration,
    pub chart_base_url: String,
    pub chart_timeout: Duration,
}

impl Default for QuoteSourceConfig {
    fn default() -> Self {
        Self {
            page_base_url: QUOTE_PAGE_BASE.to_string(),
            page_timeout: Duration::from_secs(10),
            chart_base_url: CHART_API_BASE.to_string(),
            chart_timeout: Duration::from_secs(8),
        }
    }
}
