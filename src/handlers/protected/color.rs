// handlers/protected/color.rs - colour writes

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{ActiveColor, ColorUpdate, NewColor, RowId};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson, ValidPath};

/// POST /manage/color/add
pub async fn add(State(state): State<AppState>, ValidJson(color): ValidJson<NewColor>) -> ApiResult {
    let id = state.repository.insert_color(&color).await?;
    tracing::debug!(id, "Color added");
    Ok(ApiResponse::success())
}

/// PUT /manage/color/update
pub async fn update(State(state): State<AppState>, ValidJson(color): ValidJson<ColorUpdate>) -> ApiResult {
    if state.repository.update_color(&color).await? == 0 {
        return Err(ApiError::validation(format!("color {} does not exist", color.id)));
    }
    Ok(ApiResponse::success())
}

/// PUT /manage/color/setColor - make one colour the only active one
pub async fn activate(State(state): State<AppState>, ValidJson(body): ValidJson<ActiveColor>) -> ApiResult {
    if !state.repository.activate_color(body.id).await? {
        return Err(ApiError::validation(format!("color {} does not exist", body.id)));
    }
    Ok(ApiResponse::success())
}

/// DELETE /manage/color/:id
pub async fn delete(State(state): State<AppState>, ValidPath(id): ValidPath<RowId>) -> ApiResult {
    state.repository.delete_color(id.0).await?;
    Ok(ApiResponse::ok())
}
