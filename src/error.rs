// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::TokenError;
use crate::database::DatabaseError;
use crate::export::ExportError;
use crate::filter::FilterError;

/// Client-facing messages. The frontend matches on these strings.
pub mod messages {
    pub const LOGIN_SUCCESS: &str = "登录成功";
    pub const SUCCESS: &str = "success";
    pub const OPERATION_SUCCESS: &str = "操作成功";
    pub const BAD_CREDENTIALS: &str = "账号或密码错误";
    pub const SESSION_EXPIRED: &str = "状态失效";
    pub const KEYWORD_EXISTS: &str = "单词已收藏";
    pub const INVALID_PARAMS: &str = "参数错误";
    pub const FILE_NOT_FOUND: &str = "文件不存在";
    pub const OPERATION_FAILED: &str = "操作失败";
}

/// Every failure a handler or the token gate can report.
#[derive(Debug)]
pub enum ApiError {
    /// Bad credentials at login
    AuthenticationFailed,

    /// Missing, invalid or expired token at the gate
    AuthorizationFailed(TokenError),

    /// Malformed request body, query or path
    ValidationFailed(String),

    /// Keyword already collected; carries the existing row id
    Duplicate { id: i64 },

    /// Requested export file absent
    NotFound(String),

    /// Record store or export sink failure. Detail is logged, not returned.
    StoreError(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationFailed(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Application-level code carried in the JSON body
    pub fn code(&self) -> i32 {
        match self {
            ApiError::AuthenticationFailed => -1,
            ApiError::Duplicate { .. } => -1,
            ApiError::AuthorizationFailed(_) => -2,
            ApiError::ValidationFailed(_) => -3,
            ApiError::NotFound(_) => -4,
            ApiError::StoreError(_) => -5,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            ApiError::AuthorizationFailed(_) => StatusCode::UNAUTHORIZED,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate { .. } => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::AuthenticationFailed => messages::BAD_CREDENTIALS.to_string(),
            ApiError::AuthorizationFailed(_) => messages::SESSION_EXPIRED.to_string(),
            ApiError::ValidationFailed(detail) => format!("{}: {}", messages::INVALID_PARAMS, detail),
            ApiError::Duplicate { .. } => messages::KEYWORD_EXISTS.to_string(),
            ApiError::NotFound(_) => messages::FILE_NOT_FOUND.to_string(),
            ApiError::StoreError(_) => messages::OPERATION_FAILED.to_string(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "code": self.code(),
            "msg": self.message(),
        });
        if let ApiError::Duplicate { id } = self {
            body["id"] = json!(id);
        }
        body
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::ValidationFailed(err.to_string())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Timeout(ms) => {
                tracing::error!("Record store call exceeded {} ms", ms);
                ApiError::StoreError(format!("timed out after {} ms", ms))
            }
            DatabaseError::NotFound(what) => ApiError::ValidationFailed(format!("{} does not exist", what)),
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::StoreError(sqlx_err.to_string())
            }
            other => {
                tracing::error!("Record store error: {}", other);
                ApiError::StoreError(other.to_string())
            }
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::NotFound(key) => ApiError::NotFound(key),
            ExportError::InvalidKey(reason) => ApiError::ValidationFailed(reason),
            other => {
                tracing::error!("Export error: {}", other);
                ApiError::StoreError(other.to_string())
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::AuthorizationFailed(reason) => write!(f, "{} ({})", self.message(), reason),
            ApiError::NotFound(what) | ApiError::StoreError(what) => write!(f, "{} ({})", self.message(), what),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_observed_contract() {
        assert_eq!(ApiError::AuthenticationFailed.code(), -1);
        assert_eq!(ApiError::AuthorizationFailed(TokenError::Expired).code(), -2);
        assert_eq!(ApiError::Duplicate { id: 3 }.code(), -1);
        assert!(ApiError::StoreError("x".into()).code() < 0);
    }

    #[test]
    fn store_detail_is_not_exposed() {
        let body = ApiError::StoreError("no such table: home_keywordtable".into()).to_json();
        assert_eq!(body["msg"], messages::OPERATION_FAILED);
        assert!(!body.to_string().contains("home_keywordtable"));
    }

    #[test]
    fn duplicate_carries_id() {
        let body = ApiError::Duplicate { id: 42 }.to_json();
        assert_eq!(body["id"], 42);
        assert_eq!(body["msg"], messages::KEYWORD_EXISTS);
    }

    #[test]
    fn token_reasons_collapse_to_one_message() {
        for reason in [TokenError::Missing, TokenError::Expired, TokenError::AlgorithmMismatch] {
            let err = ApiError::AuthorizationFailed(reason);
            assert_eq!(err.to_json()["msg"], messages::SESSION_EXPIRED);
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
    }
}
