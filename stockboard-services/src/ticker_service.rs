//! Ticker Service
//!
//! Watch-list and signup operations used by the HTTP layer. Input is
//! validated before any store is touched.

use std::collections::BTreeMap;
use std::sync::Arc;

use stockboard_core::{
    with_ticker_added, with_ticker_removed, NewUser, PriceRecord, StockboardError, Ticker, User,
    UserId,
};
use stockboard_quotes::PriceFetcher;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::store::{PriceStore, StoreError, TickerStore};

#[derive(Debug, Error)]
pub enum TickerServiceError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid ticker symbol: {0}")]
    InvalidTicker(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Ticker already exists: {0}")]
    Duplicate(Ticker),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("{0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for TickerServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(id) => TickerServiceError::UserNotFound(id),
            StoreError::Conflict(msg) => TickerServiceError::Conflict(msg),
            other => TickerServiceError::Store(other),
        }
    }
}

impl From<StockboardError> for TickerServiceError {
    fn from(err: StockboardError) -> Self {
        match err {
            StockboardError::InvalidTicker(raw) => TickerServiceError::InvalidTicker(raw),
            StockboardError::DuplicateTicker { ticker, .. } => match Ticker::parse(&ticker) {
                Ok(t) => TickerServiceError::Duplicate(t),
                Err(_) => TickerServiceError::InvalidTicker(ticker),
            },
            StockboardError::InvalidUserId(_) => TickerServiceError::MissingField("userId"),
        }
    }
}

pub type TickerServiceResult<T> = Result<T, TickerServiceError>;

/// Watch-list management over the ticker and price stores
#[derive(Clone)]
pub struct TickerService {
    tickers: Arc<dyn TickerStore>,
    prices: Arc<dyn PriceStore>,
    fetcher: PriceFetcher,
}

impl TickerService {
    pub fn new(
        tickers: Arc<dyn TickerStore>,
        prices: Arc<dyn PriceStore>,
        fetcher: PriceFetcher,
    ) -> Self {
        Self {
            tickers,
            prices,
            fetcher,
        }
    }

    pub async fn list_tickers(&self, user_id: &UserId) -> TickerServiceResult<Vec<Ticker>> {
        Ok(self.tickers.get_tickers(user_id).await?)
    }

    /// Add `raw` to the user's list and fetch its first price record
    #[instrument(skip(self))]
    pub async fn add_ticker(&self, user_id: &UserId, raw: &str) -> TickerServiceResult<PriceRecord> {
        let ticker = parse_ticker(raw)?;

        let current = self.tickers.get_tickers(user_id).await?;
        let updated = with_ticker_added(user_id, &current, ticker.clone())?;
        self.tickers.set_tickers(user_id, &updated).await?;
        info!("User {} added {}", user_id, ticker);

        let record = self.fetcher.fetch(&ticker).await.into_record();
        self.prices.set_one(&ticker, &record).await?;

        Ok(record)
    }

    /// Remove `raw` from the user's list; its price record is kept
    ///
    /// Removing a ticker the user does not follow succeeds without a write.
    #[instrument(skip(self))]
    pub async fn remove_ticker(&self, user_id: &UserId, raw: &str) -> TickerServiceResult<Ticker> {
        let ticker = parse_ticker(raw)?;

        let current = self.tickers.get_tickers(user_id).await?;
        match with_ticker_removed(&current, &ticker) {
            Some(updated) => {
                self.tickers.set_tickers(user_id, &updated).await?;
                info!("User {} removed {}", user_id, ticker);
            }
            None => debug!("User {} does not follow {}", user_id, ticker),
        }

        Ok(ticker)
    }

    /// Register a user with the default watch list
    ///
    /// The password is required but never stored.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> TickerServiceResult<User> {
        let username = username.trim();
        let email = email.trim();

        if email.is_empty() {
            return Err(TickerServiceError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(TickerServiceError::MissingField("password"));
        }
        if username.is_empty() {
            return Err(TickerServiceError::MissingField("username"));
        }
        if !is_plausible_email(email) {
            return Err(TickerServiceError::InvalidEmail(email.to_string()));
        }

        let user = self
            .tickers
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
            })
            .await?;
        info!("Signed up user {}", user.id);
        Ok(user)
    }

    pub async fn all_prices(&self) -> TickerServiceResult<BTreeMap<Ticker, PriceRecord>> {
        Ok(self.prices.get_all().await?)
    }
}

fn parse_ticker(raw: &str) -> TickerServiceResult<Ticker> {
    if raw.trim().is_empty() {
        return Err(TickerServiceError::MissingField("ticker"));
    }
    Ok(Ticker::parse(raw)?)
}

/// `local@domain.tld` with no whitespace
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
