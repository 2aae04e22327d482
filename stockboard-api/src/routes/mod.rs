//! API route definitions

mod auth;
mod health;
mod stocks;
mod tickers;

use axum::Router;
use crate::AppState;

/// Routes nested under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(stocks::routes())
        .merge(tickers::routes())
        .merge(health::routes())
}

/// Routes nested under `/auth`
pub fn auth_routes() -> Router<AppState> {
    auth::routes()
}
