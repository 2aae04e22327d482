//! Router harness for the route tests

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use stockboard_core::{NewUser, Ticker, User, UserId};
use stockboard_quotes::{PriceFetcher, QuoteApiSource, QuoteError, QuotePageSource};
use stockboard_services::{MemoryStore, StoreError, TickerStore};
use tower::ServiceExt;

use crate::{build_router, AppState};

pub fn user(id: &str, tickers: &[&str]) -> User {
    User {
        id: UserId::new(id).unwrap(),
        username: id.to_string(),
        email: format!("{}@example.com", id),
        tickers: tickers.iter().map(|t| Ticker::parse(t).unwrap()).collect(),
        created_at: Utc::now(),
    }
}

struct StaticPage;

#[async_trait]
impl QuotePageSource for StaticPage {
    fn name(&self) -> &'static str {
        "static-page"
    }

    async fn fetch_quote_page(&self, _ticker: &Ticker) -> Result<String, QuoteError> {
        Ok(r#"<span data-test="qsp-price">100.00</span><span data-test="qsp-price-change">+1.00 (+1.01%)</span>"#.to_string())
    }
}

struct NoApi;

#[async_trait]
impl QuoteApiSource for NoApi {
    fn name(&self) -> &'static str {
        "no-api"
    }

    async fn fetch_chart(&self, _ticker: &Ticker) -> Result<String, QuoteError> {
        Err(QuoteError::RequestFailed("offline".to_string()))
    }
}

/// Ticker store that fails every call
pub struct BrokenTickerStore;

#[async_trait]
impl TickerStore for BrokenTickerStore {
    async fn get_all_users(&self) -> Result<BTreeMap<UserId, User>, StoreError> {
        Err(StoreError::Io("database unavailable".to_string()))
    }

    async fn get_tickers(&self, _user_id: &UserId) -> Result<Vec<Ticker>, StoreError> {
        Err(StoreError::Io("database unavailable".to_string()))
    }

    async fn set_tickers(&self, _user_id: &UserId, _tickers: &[Ticker]) -> Result<(), StoreError> {
        Err(StoreError::Io("database unavailable".to_string()))
    }

    async fn create_user(&self, _new_user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Io("database unavailable".to_string()))
    }

    async fn get_user(&self, _user_id: &UserId) -> Result<Option<User>, StoreError> {
        Err(StoreError::Io("database unavailable".to_string()))
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let fetcher = PriceFetcher::new(Arc::new(StaticPage), Arc::new(NoApi));
        let state = AppState::new(store.clone(), store.clone(), fetcher);
        Self {
            store,
            app: build_router(state),
        }
    }

    /// Context whose ticker store is unusable; prices still go to `store`
    pub fn broken() -> Self {
        let store = Arc::new(MemoryStore::new());
        let fetcher = PriceFetcher::new(Arc::new(StaticPage), Arc::new(NoApi));
        let state = AppState::new(Arc::new(BrokenTickerStore), store.clone(), fetcher);
        Self {
            store,
            app: build_router(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json(bytes: &[u8]) -> Value {
        if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(bytes).unwrap()
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send(request).await;
        (status, Self::json(&body))
    }

    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send(request).await;
        (status, String::from_utf8(body).unwrap())
    }

    pub async fn post(&self, uri: &str, payload: Value) -> (StatusCode, Value) {
        self.post_raw(uri, &payload.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, payload: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, body) = self.send(request).await;
        (status, Self::json(&body))
    }
}
