// handlers/public/download.rs - GET /manage/download?file_name=
//
// Streams a previously exported spreadsheet. Public so the browser can follow
// a plain link; file names are unguessable and validated before lookup.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Validate;
use crate::error::ApiError;
use crate::export::validate_file_name;
use crate::middleware::ValidQuery;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub file_name: String,
}

impl Validate for DownloadQuery {
    fn validate(&self) -> Result<(), ApiError> {
        validate_file_name(&self.file_name).map_err(ApiError::from)
    }
}

pub async fn get(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<DownloadQuery>,
) -> Result<Response, ApiError> {
    let object = state.exports.get(&query.file_name).await?;

    let disposition = format!("attachment; filename=\"{}\"", query.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, object.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(object.stream),
    )
        .into_response())
}
