//! Services for Stockboard
//!
//! Persistence interfaces and their SQLite / in-memory implementations,
//! the price aggregator with its process-local cache, watch-list
//! operations and the periodic scheduler.

pub mod aggregator;
pub mod memory_store;
pub mod price_cache;
pub mod scheduler;
pub mod sqlite_store;
pub mod store;
pub mod ticker_service;

#[cfg(test)]
mod test_support;

pub use aggregator::{AggregatorError, AggregatorHealth, CycleReport, PriceAggregator};
pub use memory_store::MemoryStore;
pub use price_cache::PriceCache;
pub use scheduler::{Scheduler, SchedulerConfig, DEFAULT_RESET_INTERVAL, DEFAULT_UPDATE_INTERVAL};
pub use sqlite_store::SqliteStore;
pub use store::{PriceStore, StoreError, TickerStore};
pub use ticker_service::{TickerService, TickerServiceError, TickerServiceResult};
