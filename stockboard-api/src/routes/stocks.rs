//! Price listing and manual refresh

use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use stockboard_core::{PriceRecord, Ticker};
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::AppState;

/// Every stored price record keyed by symbol
async fn list_stocks(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<Ticker, PriceRecord>>> {
    Ok(Json(state.tickers.all_prices().await?))
}

/// Run one update cycle now
///
/// Always answers 200; a failed cycle is reported in the body and in health.
async fn trigger_update(State(state): State<AppState>) -> Json<Value> {
    info!("Manual price update requested");
    match state.aggregator.update_all().await {
        Ok(report) => Json(json!({
            "success": true,
            "message": "Stock data updated",
            "report": report,
        })),
        Err(e) => {
            warn!("Manual price update failed: {}", e);
            Json(json!({
                "success": false,
                "message": "Stock data update failed",
                "error": e.to_string(),
            }))
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stocks", get(list_stocks))
        .route("/update", get(trigger_update))
}
