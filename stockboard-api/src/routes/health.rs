//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use stockboard_services::AggregatorHealth;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    aggregator: AggregatorHealth,
}

/// Reports degraded when the most recent update cycle failed
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let aggregator = state.aggregator.health();

    let (code, status) = if aggregator.healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (code, Json(HealthResponse { status, aggregator }))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_before_and_after_cycle() {
        let ctx = TestContext::new();

        let (status, body) = ctx.get("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["aggregator"]["last_cycle"].is_null());

        ctx.store.insert_user(user("u1", &["AAPL"]));
        ctx.get("/api/update").await;

        let (_, body) = ctx.get("/api/health").await;
        assert_eq!(body["aggregator"]["cached_symbols"], 1);
        assert_eq!(body["aggregator"]["last_cycle"]["tickers"], 1);
    }

    #[tokio::test]
    async fn test_failed_cycle_degrades_health() {
        let ctx = TestContext::broken();

        let (status, body) = ctx.get("/api/update").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("database unavailable"));

        let (status, body) = ctx.get("/api/health").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert!(!body["aggregator"]["healthy"].as_bool().unwrap());
    }

    #[tokio::test]
    async fn test_liveness() {
        let ctx = TestContext::new();
        let (status, body) = ctx.get_text("/api/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }
}
