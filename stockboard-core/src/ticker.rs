//! Ticker symbol definitions

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::StockboardError;

static TICKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9.]{1,10}$").expect("Invalid ticker regex"));

/// A validated ticker symbol (e.g. "AAPL", "BRK.B")
///
/// Always uppercase, 1-10 characters from `[A-Z0-9.]`. The only way to build
/// one is through [`Ticker::parse`] (or the equivalent `FromStr`/`TryFrom`
/// impls), so any `Ticker` in hand is valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse user input into a ticker
    ///
    /// Surrounding whitespace is trimmed and the symbol is upper-cased
    /// before validation, so `" aapl "` yields `AAPL`.
    pub fn parse(raw: &str) -> Result<Self, StockboardError> {
        let normalized = raw.trim().to_ascii_uppercase();
        if TICKER_PATTERN.is_match(&normalized) {
            Ok(Ticker(normalized))
        } else {
            Err(StockboardError::invalid_ticker(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Ticker {
    type Err = StockboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ticker::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = StockboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ticker::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_parse_valid_tickers() {
        for raw in ["AAPL", "BRK.B", "X", "0700.HK", "ABCDEFGHIJ"] {
            let ticker = Ticker::parse(raw).unwrap();
            assert_eq!(ticker.as_str(), raw);
        }
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let ticker = Ticker::parse("  msft ").unwrap();
        assert_eq!(ticker.as_str(), "MSFT");
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(Ticker::parse("").is_err());
        assert!(Ticker::parse("   ").is_err());
        assert!(Ticker::parse("toolongtickerxx").is_err());
        assert!(Ticker::parse("AB-C").is_err());
        assert!(Ticker::parse("A B").is_err());
        assert!(Ticker::parse("$AAPL").is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let ticker = Ticker::parse("GOOGL").unwrap();
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"GOOGL\"");

        let back: Ticker = serde_json::from_str("\"GOOGL\"").unwrap();
        assert_eq!(back, ticker);

        assert!(serde_json::from_str::<Ticker>("\"not a ticker\"").is_err());
    }

    #[test]
    fn test_ticker_as_map_key() {
        let mut map = BTreeMap::new();
        map.insert(Ticker::parse("MSFT").unwrap(), 1);
        map.insert(Ticker::parse("AAPL").unwrap(), 2);

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"AAPL":2,"MSFT":1}"#);

        let back: BTreeMap<Ticker, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
