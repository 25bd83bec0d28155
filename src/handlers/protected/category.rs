// handlers/protected/category.rs - keyword groups

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{CategoryUpsert, PageQuery, RowId};
use crate::filter::Pagination;
use crate::middleware::{ApiResponse, ApiResult, ValidJson, ValidPath, ValidQuery};

/// GET /manage/category/list
pub async fn list(State(state): State<AppState>, ValidQuery(query): ValidQuery<PageQuery>) -> ApiResult {
    let page = Pagination::resolve(query.page, query.size, &state.config.filter)?;
    let listing = state.repository.list_categories(page).await?;
    Ok(ApiResponse::listing(listing))
}

/// POST /manage/category/add - insert without `id`, update with it
pub async fn add(State(state): State<AppState>, ValidJson(body): ValidJson<CategoryUpsert>) -> ApiResult {
    let uuid = state.repository.upsert_category(&body).await?;
    Ok(ApiResponse::success().field("uuid", uuid))
}

/// DELETE /manage/category/:id
pub async fn delete(State(state): State<AppState>, ValidPath(id): ValidPath<RowId>) -> ApiResult {
    state.repository.delete_category(id.0).await?;
    Ok(ApiResponse::ok())
}
