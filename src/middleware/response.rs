use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Map, Value};

use crate::database::Listing;
use crate::error::{messages, ApiError};

/// Success envelope: `{"code": 0, ...}` with operation-specific fields at the top level.
#[derive(Debug)]
pub struct ApiResponse {
    body: Map<String, Value>,
    status_code: StatusCode,
}

impl ApiResponse {
    pub fn ok() -> Self {
        let mut body = Map::new();
        body.insert("code".to_string(), json!(0));
        Self {
            body,
            status_code: StatusCode::OK,
        }
    }

    /// `{code: 0, msg: "success"}`
    pub fn success() -> Self {
        Self::ok().msg(messages::SUCCESS)
    }

    /// `{code: 0, msg: "操作成功"}`
    pub fn done() -> Self {
        Self::ok().msg(messages::OPERATION_SUCCESS)
    }

    /// `{code: 0, result, total}`
    pub fn listing(listing: Listing) -> Self {
        Self::ok()
            .field("result", listing.result)
            .field("total", listing.total)
    }

    pub fn msg(self, msg: impl Into<String>) -> Self {
        self.field("msg", msg.into())
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_string(), value.into());
        self
    }

    pub fn with_status(mut self, status_code: StatusCode) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status_code, Json(Value::Object(self.body))).into_response()
    }
}

pub type ApiResult = Result<ApiResponse, ApiError>;
