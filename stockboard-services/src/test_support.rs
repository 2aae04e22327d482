//! Fakes shared by the service tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use stockboard_core::{NewUser, PriceRecord, Ticker, User, UserId};
use stockboard_quotes::{PriceFetcher, QuoteApiSource, QuoteError, QuotePageSource};

use crate::memory_store::MemoryStore;
use crate::store::{PriceStore, StoreError, TickerStore};

pub fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).unwrap()
}

pub fn user(id: &str, tickers: &[&str]) -> User {
    User {
        id: UserId::new(id).unwrap(),
        username: id.to_string(),
        email: format!("{}@example.com", id),
        tickers: tickers.iter().map(|t| ticker(t)).collect(),
        created_at: Utc::now(),
    }
}

/// Quote page that serves a fixed price for every ticker except `failing`
#[derive(Default)]
pub struct FakePage {
    pub requested: Mutex<Vec<Ticker>>,
    pub failing: Vec<Ticker>,
}

#[async_trait]
impl QuotePageSource for FakePage {
    fn name(&self) -> &'static str {
        "fake-page"
    }

    async fn fetch_quote_page(&self, ticker: &Ticker) -> Result<String, QuoteError> {
        self.requested.lock().push(ticker.clone());
        if self.failing.contains(ticker) {
            return Err(QuoteError::ApiError {
                status: 404,
                message: "not found".to_string(),
            });
        }
        Ok(r#"<span data-test="qsp-price">100.00</span><span data-test="qsp-price-change">+1.00 (+1.01%)</span>"#.to_string())
    }
}

/// Chart API that always fails
#[derive(Default)]
pub struct DownApi {
    pub calls: AtomicUsize,
}

#[async_trait]
impl QuoteApiSource for DownApi {
    fn name(&self) -> &'static str {
        "down-api"
    }

    async fn fetch_chart(&self, _ticker: &Ticker) -> Result<String, QuoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(QuoteError::RequestFailed("connection refused".to_string()))
    }
}

pub fn fetcher(page: Arc<FakePage>) -> PriceFetcher {
    PriceFetcher::new(page, Arc::new(DownApi::default()))
}

/// Price store wrapper that counts writes
#[derive(Default)]
pub struct CountingPriceStore {
    pub inner: MemoryStore,
    pub batches: AtomicUsize,
    pub singles: AtomicUsize,
}

#[async_trait]
impl PriceStore for CountingPriceStore {
    async fn get_all(&self) -> Result<BTreeMap<Ticker, PriceRecord>, StoreError> {
        self.inner.get_all().await
    }

    async fn update_many(&self, records: BTreeMap<Ticker, PriceRecord>) -> Result<(), StoreError> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        self.inner.update_many(records).await
    }

    async fn set_one(&self, ticker: &Ticker, record: &PriceRecord) -> Result<(), StoreError> {
        self.singles.fetch_add(1, Ordering::SeqCst);
        self.inner.set_one(ticker, record).await
    }
}

/// Ticker store wrapper that counts `set_tickers` calls
#[derive(Default)]
pub struct CountingTickerStore {
    pub inner: MemoryStore,
    pub writes: AtomicUsize,
}

#[async_trait]
impl TickerStore for CountingTickerStore {
    async fn get_all_users(&self) -> Result<BTreeMap<UserId, User>, StoreError> {
        self.inner.get_all_users().await
    }

    async fn get_tickers(&self, user_id: &UserId) -> Result<Vec<Ticker>, StoreError> {
        self.inner.get_tickers(user_id).await
    }

    async fn set_tickers(&self, user_id: &UserId, tickers: &[Ticker]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_tickers(user_id, tickers).await
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.inner.create_user(new_user).await
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError> {
        self.inner.get_user(user_id).await
    }
}

/// Quote page that takes `delay` to answer each request
pub struct SlowPage {
    pub delay: Duration,
}

#[async_trait]
impl QuotePageSource for SlowPage {
    fn name(&self) -> &'static str {
        "slow-page"
    }

    async fn fetch_quote_page(&self, _ticker: &Ticker) -> Result<String, QuoteError> {
        tokio::time::sleep(self.delay).await;
        Ok(r#"<span data-test="qsp-price">100.00</span>"#.to_string())
    }
}

/// Ticker store whose every call fails and is counted
#[derive(Default)]
pub struct BrokenTickerStore {
    pub calls: AtomicUsize,
}

impl BrokenTickerStore {
    fn fail(&self) -> StoreError {
        self.calls.fetch_add(1, Ordering::SeqCst);
        StoreError::Io("disk on fire".to_string())
    }
}

#[async_trait]
impl TickerStore for BrokenTickerStore {
    async fn get_all_users(&self) -> Result<BTreeMap<UserId, User>, StoreError> {
        Err(self.fail())
    }

    async fn get_tickers(&self, _user_id: &UserId) -> Result<Vec<Ticker>, StoreError> {
        Err(self.fail())
    }

    async fn set_tickers(&self, _user_id: &UserId, _tickers: &[Ticker]) -> Result<(), StoreError> {
        Err(self.fail())
    }

    async fn create_user(&self, _new_user: NewUser) -> Result<User, StoreError> {
        Err(self.fail())
    }

    async fn get_user(&self, _user_id: &UserId) -> Result<Option<User>, StoreError> {
        Err(self.fail())
    }
}
