//! Price snapshot for a single ticker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ticker::Ticker;

/// Change text recorded when every fetch strategy failed
pub const FETCH_ERROR_CHANGE: &str = "Error fetching data";

/// Latest known price/change snapshot for one ticker
///
/// Records are overwritten on every update cycle, no history is kept.
/// Built only through [`PriceRecord::quoted`] and [`PriceRecord::failed`],
/// which keeps `errored == true` paired with `price == None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Ticker this record describes
    pub symbol: Ticker,
    /// Last traded price, absent when fetching failed
    pub price: Option<f64>,
    /// Display text for the absolute and/or percent change
    pub change: String,
    /// When this record was produced
    pub last_updated: DateTime<Utc>,
    /// Whether every fetch strategy failed for this ticker
    #[serde(default)]
    pub errored: bool,
}

impl PriceRecord {
    /// A successful quote stamped with the current time
    pub fn quoted(symbol: Ticker, price: f64, change: impl Into<String>) -> Self {
        Self {
            symbol,
            price: Some(price),
            change: change.into(),
            last_updated: Utc::now(),
            errored: false,
        }
    }

    /// A placeholder for a ticker whose data could not be retrieved
    pub fn failed(symbol: Ticker) -> Self {
        Self {
            symbol,
            price: None,
            change: FETCH_ERROR_CHANGE.to_string(),
            last_updated: Utc::now(),
            errored: true,
        }
    }
}
