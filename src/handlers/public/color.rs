// handlers/public/color.rs - GET /manage/color/list (readable without a token)

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::PageQuery;
use crate::filter::Pagination;
use crate::middleware::{ApiResponse, ApiResult, ValidQuery};

pub async fn list(State(state): State<AppState>, ValidQuery(query): ValidQuery<PageQuery>) -> ApiResult {
    let page = Pagination::resolve(query.page, query.size, &state.config.filter)?;
    let listing = state.repository.list_colors(page).await?;
    Ok(ApiResponse::listing(listing))
}
