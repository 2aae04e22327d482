//! Watch-list endpoints

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use stockboard_core::{Ticker, UserId};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const FIELDS_REQUIRED: &str = "Ticker symbol and user ID are required";

#[derive(Debug, Deserialize)]
pub struct TickersQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TickerRequest {
    pub ticker: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl TickerRequest {
    /// Both fields present and non-blank
    fn into_parts(self) -> ApiResult<(UserId, String)> {
        let ticker = self
            .ticker
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest(FIELDS_REQUIRED.to_string()))?;
        let user_id = self
            .user_id
            .and_then(|id| UserId::new(id).ok())
            .ok_or_else(|| ApiError::BadRequest(FIELDS_REQUIRED.to_string()))?;
        Ok((user_id, ticker))
    }
}

fn parse_body(payload: Result<Json<TickerRequest>, JsonRejection>) -> ApiResult<(UserId, String)> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest(FIELDS_REQUIRED.to_string()))?;
    request.into_parts()
}

async fn list_tickers(
    State(state): State<AppState>,
    Query(query): Query<TickersQuery>,
) -> ApiResult<Json<Vec<Ticker>>> {
    let user_id = query
        .user_id
        .and_then(|id| UserId::new(id).ok())
        .ok_or_else(|| ApiError::Unauthorized("User ID required".to_string()))?;

    Ok(Json(state.tickers.list_tickers(&user_id).await?))
}

async fn add_ticker(
    State(state): State<AppState>,
    payload: Result<Json<TickerRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let (user_id, raw) = parse_body(payload)?;
    let record = state.tickers.add_ticker(&user_id, &raw).await?;

    Ok(Json(json!({
        "success": true,
        "ticker": record.symbol,
        "data": record,
    })))
}

async fn remove_ticker(
    State(state): State<AppState>,
    payload: Result<Json<TickerRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let (user_id, raw) = parse_body(payload)?;
    let ticker = state.tickers.remove_ticker(&user_id, &raw).await?;

    Ok(Json(json!({ "success": true, "ticker": ticker })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickers", get(list_tickers))
        .route("/add_ticker", post(add_ticker))
        .route("/remove_ticker", post(remove_ticker))
}
