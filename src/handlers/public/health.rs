// handlers/public/health.rs - GET /health

use axum::{extract::State, http::StatusCode};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// `{code: 0, status: "ok"}` when the record store answers, 503 otherwise.
pub async fn get(State(state): State<AppState>) -> ApiResponse {
    match state.repository.store().ping().await {
        Ok(()) => ApiResponse::ok().field("status", "ok"),
        Err(e) => {
            let err = ApiError::from(e);
            ApiResponse::ok()
                .field("code", err.code())
                .msg(err.message())
                .field("status", "unavailable")
                .with_status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
