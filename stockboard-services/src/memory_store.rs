//! In-memory store, used by tests and `STOCKBOARD_STORE=memory`

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use stockboard_core::{default_tickers, NewUser, PriceRecord, Ticker, User, UserId};
use uuid::Uuid;

use crate::store::{PriceStore, StoreError, TickerStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<UserId, User>>,
    prices: RwLock<BTreeMap<Ticker, PriceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed user, replacing any existing one with the same id
    pub fn insert_user(&self, user: User) {
        self.users.write().insert(user.id.clone(), user);
    }
}

#[async_trait]
impl TickerStore for MemoryStore {
    async fn get_all_users(&self) -> Result<BTreeMap<UserId, User>, StoreError> {
        Ok(self.users.read().clone())
    }

    async fn get_tickers(&self, user_id: &UserId) -> Result<Vec<Ticker>, StoreError> {
        self.users
            .read()
            .get(user_id)
            .map(|u| u.tickers.clone())
            .ok_or_else(|| StoreError::UserNotFound(user_id.clone()))
    }

    async fn set_tickers(&self, user_id: &UserId, tickers: &[Ticker]) -> Result<(), StoreError> {
        let mut users = self.users.write();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.clone()))?;

        let mut deduped: Vec<Ticker> = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            if !deduped.contains(ticker) {
                deduped.push(ticker.clone());
            }
        }
        user.tickers = deduped;
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write();
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(StoreError::Conflict(format!(
                "Email already registered: {}",
                new_user.email
            )));
        }

        let id = UserId::new(Uuid::new_v4().to_string())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let user = User {
            id: id.clone(),
            username: new_user.username,
            email: new_user.email,
            tickers: default_tickers(),
            created_at: Utc::now(),
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(user_id).cloned())
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn get_all(&self) -> Result<BTreeMap<Ticker, PriceRecord>, StoreError> {
        Ok(self.prices.read().clone())
    }

    async fn update_many(&self, records: BTreeMap<Ticker, PriceRecord>) -> Result<(), StoreError> {
        self.prices.write().extend(records);
        Ok(())
    }

    async fn set_one(&self, ticker: &Ticker, record: &PriceRecord) -> Result<(), StoreError> {
        self.prices.write().insert(ticker.clone(), record.clone());
        Ok(())
    }
}
