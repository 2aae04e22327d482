//! Chart API client (fallback strategy)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use stockboard_core::Ticker;
use tracing::{debug, instrument};

use crate::config::QuoteSourceConfig;
use crate::error::QuoteError;
use crate::source::QuoteApiSource;

/// Chart endpoint response envelope
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Price and formatted change derived from the chart endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ChartQuote {
    pub price: f64,
    pub previous_close: f64,
    pub change: String,
}

impl ChartQuote {
    /// Derive the change text from price and previous close
    ///
    /// Formatted as `"<change> (<percent>%)"`, both to two decimals.
    pub fn from_prices(price: f64, previous_close: f64) -> Result<Self, QuoteError> {
        if !price.is_finite() || !previous_close.is_finite() {
            return Err(QuoteError::ParseError("Non-finite chart prices".to_string()));
        }
        if previous_close <= 0.0 {
            return Err(QuoteError::ParseError(format!(
                "Unusable previous close: {}",
                previous_close
            )));
        }

        let change = price - previous_close;
        let change_percent = change / previous_close * 100.0;

        Ok(Self {
            price,
            previous_close,
            change: format!("{:.2} ({:.2}%)", change, change_percent),
        })
    }
}

/// Chart API client for query1.finance.yahoo.com
#[derive(Debug, Clone)]
pub struct YahooChartApi {
    client: Client,
    base_url: String,
}

impl YahooChartApi {
    pub fn new(config: &QuoteSourceConfig) -> Result<Self, QuoteError> {
        Self::with_base_url(&config.chart_base_url, config.chart_timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuoteError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QuoteApiSource for YahooChartApi {
    fn name(&self) -> &'static str {
        "chart-api"
    }

    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn fetch_chart(&self, ticker: &Ticker) -> Result<String, QuoteError> {
        let url = format!("{}/{}", self.base_url, ticker);
        debug!("Fetching chart quote: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(QuoteError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

/// Extract the first result's price and previous close from a chart body
pub fn parse_chart_response(body: &str) -> Result<ChartQuote, QuoteError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| QuoteError::ParseError(e.to_string()))?;

    if let Some(err) = response.chart.error {
        return Err(QuoteError::ApiError {
            status: 200,
            message: format!(
                "{}: {}",
                err.code.unwrap_or_else(|| "unknown".to_string()),
                err.description.unwrap_or_default()
            ),
        });
    }

    let meta = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|r| r.meta)
        .ok_or(QuoteError::MissingField("chart.result"))?;

    let price = meta
        .regular_market_price
        .ok_or(QuoteError::MissingField("regularMarketPrice"))?;
    let previous_close = meta
        .previous_close
        .ok_or(QuoteError::MissingField("previousClose"))?;

    ChartQuote::from_prices(price, previous_close)
}
