//! SQLite Store
//!
//! Durable implementation of both [`TickerStore`] and [`PriceStore`] on a
//! single SQLite connection.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use stockboard_core::{default_tickers, NewUser, PriceRecord, Ticker, User, UserId};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::store::{PriceStore, StoreError, TickerStore};

/// Ticker and price storage backed by SQLite
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path`
    ///
    /// Creates the parent directory and tables if they don't exist.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Io(format!("Failed to create database directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(db_path.as_ref())?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;

        info!("Opened SQLite store at {}", db_path.as_ref().display());
        Ok(store)
    }

    /// Create an in-memory store (useful for testing)
    pub fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_tickers (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                symbol TEXT NOT NULL,
                position INTEGER NOT NULL,
                UNIQUE (user_id, symbol)
            );

            CREATE INDEX IF NOT EXISTS idx_user_tickers_user
            ON user_tickers(user_id, position);

            CREATE TABLE IF NOT EXISTS prices (
                symbol TEXT PRIMARY KEY,
                price REAL,
                change TEXT NOT NULL,
                last_updated INTEGER NOT NULL,
                errored INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )?;

        Ok(())
    }

    fn user_exists(conn: &Connection, user_id: &UserId) -> Result<bool, StoreError> {
        let found = conn
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                params![user_id.as_str()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn load_tickers(conn: &Connection, user_id: &UserId) -> Result<Vec<Ticker>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT symbol FROM user_tickers WHERE user_id = ?1 ORDER BY position ASC",
        )?;

        let symbols = stmt
            .query_map(params![user_id.as_str()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(symbols
            .into_iter()
            .filter_map(|s| parse_stored_symbol(&s))
            .collect())
    }

    fn write_price(conn: &Connection, ticker: &Ticker, record: &PriceRecord) -> Result<(), StoreError> {
        conn.execute(
            r#"
            INSERT OR REPLACE INTO prices (symbol, price, change, last_updated, errored)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                ticker.as_str(),
                record.price,
                record.change,
                record.last_updated.timestamp_millis(),
                record.errored,
            ],
        )?;
        Ok(())
    }
}

/// Parse a symbol read back from the database, skipping invalid rows
fn parse_stored_symbol(raw: &str) -> Option<Ticker> {
    match Ticker::parse(raw) {
        Ok(ticker) => Some(ticker),
        Err(e) => {
            warn!("Skipping stored row with invalid symbol {:?}: {}", raw, e);
            None
        }
    }
}

fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_else(Utc::now)
}

#[async_trait]
impl TickerStore for SqliteStore {
    async fn get_all_users(&self) -> Result<BTreeMap<UserId, User>, StoreError> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare("SELECT id, username, email, created_at FROM users")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut users = BTreeMap::new();
        for (id, username, email, created_at) in rows {
            let Ok(id) = UserId::new(id) else {
                warn!("Skipping user row with blank id");
                continue;
            };
            users.insert(
                id.clone(),
                User {
                    id,
                    username,
                    email,
                    tickers: Vec::new(),
                    created_at: from_millis(created_at),
                },
            );
        }

        let mut stmt =
            conn.prepare("SELECT user_id, symbol FROM user_tickers ORDER BY user_id, position")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (user_id, symbol) in rows {
            let Some(ticker) = parse_stored_symbol(&symbol) else {
                continue;
            };
            let Ok(user_id) = UserId::new(user_id) else {
                continue;
            };
            if let Some(user) = users.get_mut(&user_id) {
                user.tickers.push(ticker);
            }
        }

        Ok(users)
    }

    async fn get_tickers(&self, user_id: &UserId) -> Result<Vec<Ticker>, StoreError> {
        let conn = self.conn.lock();
        if !Self::user_exists(&conn, user_id)? {
            return Err(StoreError::UserNotFound(user_id.clone()));
        }
        Self::load_tickers(&conn, user_id)
    }

    async fn set_tickers(&self, user_id: &UserId, tickers: &[Ticker]) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        if !Self::user_exists(&tx, user_id)? {
            return Err(StoreError::UserNotFound(user_id.clone()));
        }

        tx.execute(
            "DELETE FROM user_tickers WHERE user_id = ?1",
            params![user_id.as_str()],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO user_tickers (user_id, symbol, position) VALUES (?1, ?2, ?3)",
            )?;
            for (position, ticker) in tickers.iter().enumerate() {
                stmt.execute(params![user_id.as_str(), ticker.as_str(), position as i64])?;
            }
        }
        tx.commit()?;

        debug!("Stored {} tickers for user {}", tickers.len(), user_id);
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let taken = tx
            .query_row(
                "SELECT 1 FROM users WHERE email = ?1",
                params![new_user.email],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if taken {
            return Err(StoreError::Conflict(format!(
                "Email already registered: {}",
                new_user.email
            )));
        }

        let id = UserId::new(Uuid::new_v4().to_string())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let created_at = Utc::now();
        let tickers = default_tickers();

        tx.execute(
            "INSERT INTO users (id, username, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.as_str(),
                new_user.username,
                new_user.email,
                created_at.timestamp_millis()
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO user_tickers (user_id, symbol, position) VALUES (?1, ?2, ?3)",
            )?;
            for (position, ticker) in tickers.iter().enumerate() {
                stmt.execute(params![id.as_str(), ticker.as_str(), position as i64])?;
            }
        }
        tx.commit()?;

        info!("Created user {} ({})", id, new_user.email);
        Ok(User {
            id,
            username: new_user.username,
            email: new_user.email,
            tickers,
            created_at: from_millis(created_at.timestamp_millis()),
        })
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock();

        let row = conn
            .query_row(
                "SELECT username, email, created_at FROM users WHERE id = ?1",
                params![user_id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((username, email, created_at)) = row else {
            return Ok(None);
        };

        Ok(Some(User {
            id: user_id.clone(),
            username,
            email,
            tickers: Self::load_tickers(&conn, user_id)?,
            created_at: from_millis(created_at),
        }))
    }
}

#[async_trait]
impl PriceStore for SqliteStore {
    async fn get_all(&self) -> Result<BTreeMap<Ticker, PriceRecord>, StoreError> {
        let conn = self.conn.lock();

        let mut stmt =
            conn.prepare("SELECT symbol, price, change, last_updated, errored FROM prices")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<f64>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, bool>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = BTreeMap::new();
        for (symbol, price, change, last_updated, errored) in rows {
            let Some(ticker) = parse_stored_symbol(&symbol) else {
                continue;
            };
            records.insert(
                ticker.clone(),
                PriceRecord {
                    symbol: ticker,
                    price,
                    change,
                    last_updated: from_millis(last_updated),
                    errored,
                },
            );
        }

        Ok(records)
    }

    async fn update_many(&self, records: BTreeMap<Ticker, PriceRecord>) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for (ticker, record) in &records {
            Self::write_price(&tx, ticker, record)?;
        }
        tx.commit()?;

        debug!("Wrote {} price records", records.len());
        Ok(())
    }

    async fn set_one(&self, ticker: &Ticker, record: &PriceRecord) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        Self::write_price(&conn, ticker, record)
    }
}
