// handlers/public/login.rs - GET /manage/login

use axum::extract::State;
use chrono::Utc;
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::Validate;
use crate::error::{messages, ApiError};
use crate::middleware::{ApiResponse, ApiResult, ValidQuery};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Client clock in milliseconds; becomes the token's issued-at second
    pub t: Option<i64>,
}

impl Validate for LoginQuery {
    fn validate(&self) -> Result<(), ApiError> {
        match self.t {
            Some(t) if t < 0 => Err(ApiError::validation("t must be a non-negative millisecond timestamp")),
            _ => Ok(()),
        }
    }
}

/// Exchange the service account credentials for a token.
///
/// Success: `{code: 0, msg: "登录成功", token, username}`. A wrong pair gets
/// `AuthenticationFailed` without saying which half was wrong.
pub async fn get(State(state): State<AppState>, ValidQuery(query): ValidQuery<LoginQuery>) -> ApiResult {
    if !state.credentials.verify(&query.username, &query.password) {
        tracing::warn!("Login rejected: credentials did not match");
        return Err(ApiError::AuthenticationFailed);
    }

    let issued_at = match query.t {
        Some(millis) => millis.div_euclid(1000),
        None => Utc::now().timestamp(),
    };
    let token = state.tokens.issue(&query.username, issued_at).map_err(|e| {
        tracing::error!("Token signing failed: {}", e);
        ApiError::StoreError(e.to_string())
    })?;

    tracing::info!(username = %query.username, issued_at, "Login succeeded");
    Ok(ApiResponse::ok()
        .msg(messages::LOGIN_SUCCESS)
        .field("token", token)
        .field("username", query.username))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::config::AppConfig;
    use crate::database::{DatabaseManager, SqliteStore};
    use crate::export::ObjectStoreSink;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn state() -> AppState {
        let mut config = AppConfig::development();
        config.database.url = "sqlite::memory:".to_string();
        config.security.username = "admin".to_string();
        config.security.password = "pw".to_string();
        config.security.jwt_secret = "login-test".to_string();
        let pool = DatabaseManager::connect(&config.database).await.unwrap();
        let store = Arc::new(SqliteStore::new(pool, &config.database));
        AppState::new(config, store, Arc::new(ObjectStoreSink::in_memory("export")))
    }

    #[tokio::test]
    async fn rejected_login_does_not_log_submitted_values() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let query = LoginQuery {
            username: "hunter2-typed-here".to_string(),
            password: "pw".to_string(),
            t: None,
        };
        let err = get(State(state().await), ValidQuery(query)).await.unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed));

        let logged = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("Login rejected"));
        assert!(!logged.contains("hunter2-typed-here"));
    }
}
