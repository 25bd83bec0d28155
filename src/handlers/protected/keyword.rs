// handlers/protected/keyword.rs - keyword collection

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{GroupAssignment, IdQuery, KeywordIds, NewKeyword, RemarkUpdate, RowId};
use crate::database::KeywordInsert;
use crate::error::ApiError;
use crate::filter::{Filter, KeywordFilter};
use crate::middleware::{ApiResponse, ApiResult, ValidJson, ValidPath, ValidQuery};

/// GET /manage/keyword/list - filtered, sorted, paginated listing
pub async fn list(State(state): State<AppState>, ValidQuery(query): ValidQuery<KeywordFilter>) -> ApiResult {
    let filter = Filter::new(&query, &state.config.filter)?;
    let listing = state.repository.list_keywords(&filter).await?;
    Ok(ApiResponse::listing(listing))
}

/// POST /manage/keyword/add - collect a word once; repeats report the existing id
pub async fn add(State(state): State<AppState>, ValidJson(keyword): ValidJson<NewKeyword>) -> ApiResult {
    match state.repository.insert_keyword(&keyword).await? {
        KeywordInsert::Created(id) => Ok(ApiResponse::done().field("id", id)),
        KeywordInsert::Exists(id) => Err(ApiError::Duplicate { id }),
    }
}

/// PUT /manage/keyword/put - move keywords into a group
pub async fn assign_group(State(state): State<AppState>, ValidJson(body): ValidJson<GroupAssignment>) -> ApiResult {
    let ids = body.ids()?;
    state.repository.assign_group(&ids, &body.group_id).await?;
    Ok(ApiResponse::success())
}

/// DELETE /manage/keyword/delete - body is a JSON array of ids
pub async fn delete_many(State(state): State<AppState>, ValidJson(body): ValidJson<KeywordIds>) -> ApiResult {
    let ids = body.ids()?;
    let removed = state.repository.delete_keywords(&ids).await?;
    tracing::info!(requested = ids.len(), removed, "Keywords deleted");
    Ok(ApiResponse::done())
}

/// DELETE /manage/keyword/:id
pub async fn delete(State(state): State<AppState>, ValidPath(id): ValidPath<RowId>) -> ApiResult {
    state.repository.delete_keyword(id.0).await?;
    Ok(ApiResponse::done())
}

/// PUT /manage/keyword/remark
pub async fn remark(State(state): State<AppState>, ValidJson(body): ValidJson<RemarkUpdate>) -> ApiResult {
    if state.repository.update_remark(body.id, &body.remark).await? == 0 {
        return Err(ApiError::validation(format!("keyword {} does not exist", body.id)));
    }
    Ok(ApiResponse::success())
}

/// GET /manage/keyword/byId?id= - joined row as a one-element list (empty when absent)
pub async fn by_id(State(state): State<AppState>, ValidQuery(query): ValidQuery<IdQuery>) -> ApiResult {
    let rows = state.repository.keyword_by_id(query.id).await?;
    Ok(ApiResponse::ok().field("result", rows))
}
