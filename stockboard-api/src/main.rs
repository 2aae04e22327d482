//! Stockboard API Server
//!
//! Serves the watch-list and price endpoints, the static dashboard, and
//! runs the periodic price updates.

mod config;
mod error;
mod routes;

#[cfg(test)]
mod test_support;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, Method},
    response::Response,
    Router,
};
use stockboard_quotes::{PriceFetcher, QuoteSourceConfig};
use stockboard_services::{
    MemoryStore, PriceAggregator, PriceStore, Scheduler, SqliteStore, TickerService, TickerStore,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{AppConfig, StoreKind};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<PriceAggregator>,
    pub tickers: Arc<TickerService>,
}

impl AppState {
    pub fn new(
        ticker_store: Arc<dyn TickerStore>,
        price_store: Arc<dyn PriceStore>,
        fetcher: PriceFetcher,
    ) -> Self {
        let aggregator = PriceAggregator::new(
            Arc::clone(&ticker_store),
            Arc::clone(&price_store),
            fetcher.clone(),
        );
        let tickers = TickerService::new(ticker_store, price_store, fetcher);
        Self {
            aggregator: Arc::new(aggregator),
            tickers: Arc::new(tickers),
        }
    }
}

/// API and auth routes with the shared middleware stack
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .nest("/auth", routes::auth_routes())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error::server_error(&message)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,stockboard_api=debug")),
        )
        .init();
}

fn open_stores(config: &AppConfig) -> anyhow::Result<(Arc<dyn TickerStore>, Arc<dyn PriceStore>)> {
    match config.store {
        StoreKind::Sqlite => {
            info!("Opening SQLite store at: {}", config.db_path.display());
            let store = Arc::new(
                SqliteStore::new(&config.db_path).context("Failed to initialize SQLite store")?,
            );
            let tickers: Arc<dyn TickerStore> = store.clone();
            let prices: Arc<dyn PriceStore> = store;
            Ok((tickers, prices))
        }
        StoreKind::Memory => {
            info!("Using in-memory store; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            let tickers: Arc<dyn TickerStore> = store.clone();
            let prices: Arc<dyn PriceStore> = store;
            Ok((tickers, prices))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_env_files();
    init_tracing();

    info!("Starting Stockboard API");
    let config = AppConfig::from_env();

    let (ticker_store, price_store) = open_stores(&config)?;
    let fetcher = PriceFetcher::from_config(&QuoteSourceConfig::default())
        .context("Failed to build quote clients")?;
    let state = AppState::new(ticker_store, price_store, fetcher);

    let scheduler = if config.scheduler_enabled {
        Some(Scheduler::start(
            Arc::clone(&state.aggregator),
            config.scheduler.clone(),
        ))
    } else {
        info!("Scheduler disabled; prices update only through /api/update");
        None
    };

    let index_file = config.public_dir.join("index.html");
    let static_files = ServeDir::new(&config.public_dir).fallback(ServeFile::new(index_file));
    let app = build_router(state).fallback_service(static_files);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown();
    }
    Ok(())
}
