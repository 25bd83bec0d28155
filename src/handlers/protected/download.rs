// handlers/protected/download.rs - POST /manage/download
//
// Builds the keyword spreadsheet and stores it in the export sink. The
// response carries the file name for GET /manage/download.

use axum::extract::State;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Validate;
use crate::error::ApiError;
use crate::export::write_export;
use crate::filter::{Filter, IdList, KeywordFilter};
use crate::middleware::{ApiResponse, ApiResult, ValidJson};

/// Keyword filter fields, or an explicit id selection that takes precedence
#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub filter: KeywordFilter,
    #[serde(default)]
    pub ids: Option<Vec<i64>>,
}

impl ExportRequest {
    fn selection(&self) -> Result<Option<IdList>, ApiError> {
        match self.ids.as_deref() {
            Some(ids) if !ids.is_empty() => Ok(Some(IdList::new(ids.to_vec())?)),
            _ => Ok(None),
        }
    }
}

impl Validate for ExportRequest {
    fn validate(&self) -> Result<(), ApiError> {
        self.selection().map(|_| ())
    }
}

pub async fn post(State(state): State<AppState>, ValidJson(body): ValidJson<ExportRequest>) -> ApiResult {
    let rows = match body.selection()? {
        Some(ids) => state.repository.keywords_by_ids(&ids).await?,
        None => {
            let filter = Filter::new(&body.filter, &state.config.filter)?;
            state.repository.export_keywords(&filter).await?
        }
    };

    let file_name = write_export(state.exports.as_ref(), rows).await?;
    Ok(ApiResponse::ok().field("file_name", file_name))
}
