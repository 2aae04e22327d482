//! Persistence interfaces
//!
//! The aggregator and ticker service only depend on these traits. Two
//! implementations ship with the crate: [`crate::SqliteStore`] for real
//! deployments and [`crate::MemoryStore`] for tests and ephemeral runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use stockboard_core::{NewUser, PriceRecord, Ticker, User, UserId};
use thiserror::Error;

/// Users and their ticker watch lists
#[async_trait]
pub trait TickerStore: Send + Sync {
    /// Every user keyed by id
    async fn get_all_users(&self) -> Result<BTreeMap<UserId, User>, StoreError>;

    /// Tickers followed by `user_id`, in insertion order
    async fn get_tickers(&self, user_id: &UserId) -> Result<Vec<Ticker>, StoreError>;

    /// Replace the whole watch list of `user_id`
    async fn set_tickers(&self, user_id: &UserId, tickers: &[Ticker]) -> Result<(), StoreError>;

    /// Register a user with the default watch list
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError>;
}

/// Latest price record per ticker
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn get_all(&self) -> Result<BTreeMap<Ticker, PriceRecord>, StoreError>;

    /// Upsert every given record; keys not in `records` are left alone
    async fn update_many(&self, records: BTreeMap<Ticker, PriceRecord>) -> Result<(), StoreError>;

    async fn set_one(&self, ticker: &Ticker, record: &PriceRecord) -> Result<(), StoreError>;
}

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}
