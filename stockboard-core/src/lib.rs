//! Core types for Stockboard
//!
//! This crate defines the shared data structures used across the workspace:
//! ticker symbols, users and their watch lists, and price snapshots.

pub mod error;
pub mod price;
pub mod ticker;
pub mod user;

pub use error::{StockboardError, StockboardResult};
pub use price::{PriceRecord, FETCH_ERROR_CHANGE};
pub use ticker::Ticker;
pub use user::{
    default_tickers, with_ticker_added, with_ticker_removed, NewUser, User, UserId, DEFAULT_TICKERS,
};
