//! Signup

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

const FIELDS_REQUIRED: &str = "Email, password, and username are required";

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest(FIELDS_REQUIRED.to_string()))?;

    let (Some(email), Some(password), Some(username)) =
        (request.email, request.password, request.username)
    else {
        return Err(ApiError::BadRequest(FIELDS_REQUIRED.to_string()));
    };
    if email.trim().is_empty() || password.is_empty() || username.trim().is_empty() {
        return Err(ApiError::BadRequest(FIELDS_REQUIRED.to_string()));
    }

    let user = state.tickers.signup(&username, &email, &password).await?;
    Ok(Json(json!({ "success": true, "uid": user.id })))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_signup_creates_user_with_defaults() {
        let ctx = TestContext::new();

        let (status, body) = ctx
            .post(
                "/auth/signup",
                json!({ "email": "kim@example.com", "password": "pw", "username": "kim" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let uid = body["uid"].as_str().unwrap().to_string();
        let (status, tickers) = ctx.get(&format!("/api/tickers?userId={}", uid)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(tickers, json!(["AAPL", "MSFT", "GOOGL"]));
    }

    #[tokio::test]
    async fn test_signup_rejections() {
        let ctx = TestContext::new();
        let valid = json!({ "email": "kim@example.com", "password": "pw", "username": "kim" });
        assert_eq!(ctx.post("/auth/signup", valid.clone()).await.0, StatusCode::OK);

        let (status, body) = ctx.post("/auth/signup", valid).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("kim@example.com"));

        let (status, body) = ctx
            .post("/auth/signup", json!({ "email": "x@example.com", "username": "x" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email, password, and username are required");

        let (status, body) = ctx
            .post(
                "/auth/signup",
                json!({ "email": "not-an-email", "password": "pw", "username": "x" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid email address");
    }
}
