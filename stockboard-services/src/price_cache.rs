//! Process-local price cache
//!
//! Mirrors the most recent record per ticker written by the aggregator.
//! Never authoritative; the price store is what the API reads.

use std::collections::BTreeMap;

use dashmap::DashMap;
use stockboard_core::{PriceRecord, Ticker};

#[derive(Debug, Default)]
pub struct PriceCache {
    records: DashMap<Ticker, PriceRecord>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for its symbol
    pub fn insert(&self, record: PriceRecord) {
        self.records.insert(record.symbol.clone(), record);
    }

    pub fn get(&self, ticker: &Ticker) -> Option<PriceRecord> {
        self.records.get(ticker).map(|r| r.value().clone())
    }

    /// Sorted copy of every cached record
    pub fn snapshot(&self) -> BTreeMap<Ticker, PriceRecord> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_by_symbol() {
        let cache = PriceCache::new();
        let aapl = Ticker::parse("AAPL").unwrap();

        cache.insert(PriceRecord::failed(aapl.clone()));
        cache.insert(PriceRecord::quoted(aapl.clone(), 190.0, "+1.00 (+0.53%)"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&aapl).unwrap().price, Some(190.0));
    }

    #[test]
    fn test_snapshot_and_clear() {
        let cache = PriceCache::new();
        for raw in ["MSFT", "AAPL"] {
            cache.insert(PriceRecord::quoted(Ticker::parse(raw).unwrap(), 1.0, ""));
        }

        let keys: Vec<String> = cache.snapshot().keys().map(|t| t.to_string()).collect();
        assert_eq!(keys, vec!["AAPL", "MSFT"]);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.snapshot().is_empty());
    }
}
