//! Price Aggregator
//!
//! Collects the distinct tickers followed by any user, fetches each one
//! concurrently and writes the results to the price store in a single batch.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use stockboard_core::{PriceRecord, Ticker};
use stockboard_quotes::{FetchOutcome, PriceFetcher};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::price_cache::PriceCache;
use crate::store::{PriceStore, StoreError, TickerStore};

/// Summary of one update cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleReport {
    /// Distinct tickers fetched
    pub tickers: usize,
    /// Records produced by the quote page
    pub primary: usize,
    /// Records produced by the chart API fallback
    pub fallback: usize,
    /// Tickers for which both strategies failed
    pub failed: usize,
    /// Records written to the price store
    pub written: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// Aggregator health for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AggregatorHealth {
    pub last_cycle: Option<CycleReport>,
    pub last_error: Option<String>,
    pub cached_symbols: usize,
    pub healthy: bool,
}

#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Failed to read watch lists: {0}")]
    ReadTickers(#[source] StoreError),

    #[error("Failed to write prices: {0}")]
    WritePrices(#[source] StoreError),
}

#[derive(Debug, Default)]
struct CycleStatus {
    last_cycle: Option<CycleReport>,
    last_error: Option<String>,
}

/// Runs update cycles over the stores
pub struct PriceAggregator {
    tickers: Arc<dyn TickerStore>,
    prices: Arc<dyn PriceStore>,
    fetcher: PriceFetcher,
    cache: PriceCache,
    status: RwLock<CycleStatus>,
}

impl PriceAggregator {
    pub fn new(
        tickers: Arc<dyn TickerStore>,
        prices: Arc<dyn PriceStore>,
        fetcher: PriceFetcher,
    ) -> Self {
        Self {
            tickers,
            prices,
            fetcher,
            cache: PriceCache::new(),
            status: RwLock::new(CycleStatus::default()),
        }
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Refresh every followed ticker once
    ///
    /// With no followed tickers the price store is not touched. Store
    /// failures are returned; per-ticker fetch failures become errored
    /// records instead.
    pub async fn update_all(&self) -> Result<CycleReport, AggregatorError> {
        let result = self.cycle().await;

        let mut status = self.status.write();
        match &result {
            Ok(report) => {
                status.last_cycle = Some(report.clone());
                status.last_error = None;
            }
            Err(e) => status.last_error = Some(e.to_string()),
        }
        drop(status);

        result
    }

    async fn cycle(&self) -> Result<CycleReport, AggregatorError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let users = self
            .tickers
            .get_all_users()
            .await
            .map_err(AggregatorError::ReadTickers)?;

        let distinct: BTreeSet<Ticker> = users
            .into_values()
            .flat_map(|user| user.tickers)
            .collect();

        if distinct.is_empty() {
            debug!("No tickers followed, skipping price update");
            return Ok(CycleReport {
                started_at,
                elapsed_ms: clock.elapsed().as_millis() as u64,
                ..CycleReport::default()
            });
        }

        debug!("Fetching {} distinct tickers", distinct.len());
        let outcomes = join_all(distinct.iter().map(|t| self.fetcher.fetch(t))).await;

        let mut report = CycleReport {
            tickers: distinct.len(),
            started_at,
            ..CycleReport::default()
        };
        let mut batch: BTreeMap<Ticker, PriceRecord> = BTreeMap::new();

        for outcome in outcomes {
            match &outcome {
                FetchOutcome::Success(_) => report.primary += 1,
                FetchOutcome::FallbackSuccess(_) => report.fallback += 1,
                FetchOutcome::Failed(_) => report.failed += 1,
            }
            let record = outcome.into_record();
            self.cache.insert(record.clone());
            batch.insert(record.symbol.clone(), record);
        }

        report.written = batch.len();
        self.prices
            .update_many(batch)
            .await
            .map_err(AggregatorError::WritePrices)?;

        report.elapsed_ms = clock.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Run a cycle, logging the outcome instead of returning it
    pub async fn run_cycle(&self) {
        match self.update_all().await {
            Ok(report) => info!(
                "Updated {} tickers ({} primary, {} fallback, {} failed) in {}ms",
                report.tickers, report.primary, report.fallback, report.failed, report.elapsed_ms
            ),
            Err(e) => error!("Price update failed: {}", e),
        }
    }

    /// Clear the cache, then run a fresh cycle
    pub async fn daily_reset(&self) {
        let cleared = self.cache.len();
        self.cache.clear();
        info!("Cleared {} cached prices for daily reset", cleared);
        self.run_cycle().await;
    }

    pub fn health(&self) -> AggregatorHealth {
        let status = self.status.read();
        AggregatorHealth {
            last_cycle: status.last_cycle.clone(),
            last_error: status.last_error.clone(),
            cached_symbols: self.cache.len(),
            healthy: status.last_error.is_none(),
        }
    }
}

impl std::fmt::Debug for PriceAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceAggregator")
            .field("fetcher", &self.fetcher)
            .field("cached_symbols", &self.cache.len())
            .finish()
    }
}
