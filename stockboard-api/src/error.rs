//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stockboard_services::TickerServiceError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => return server_error(&msg),
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

/// Generic 500 body, shared with the panic handler
pub fn server_error(message: &str) -> Response {
    error!("Server error: {}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Server error", "message": message })),
    )
        .into_response()
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<TickerServiceError> for ApiError {
    fn from(err: TickerServiceError) -> Self {
        match err {
            TickerServiceError::MissingField(_) => ApiError::BadRequest(err.to_string()),
            TickerServiceError::InvalidTicker(_) => {
                ApiError::BadRequest("Invalid ticker symbol".to_string())
            }
            TickerServiceError::InvalidEmail(_) => {
                ApiError::BadRequest("Invalid email address".to_string())
            }
            TickerServiceError::Duplicate(_) => {
                ApiError::BadRequest("Ticker already exists".to_string())
            }
            TickerServiceError::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
            TickerServiceError::Conflict(msg) => ApiError::Conflict(msg),
            TickerServiceError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}
