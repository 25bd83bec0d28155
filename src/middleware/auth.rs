use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::auth::{Claims, TokenError, TokenService};
use crate::error::ApiError;

/// Identity established by the token gate, available to gated handlers as an extension
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// Token gate for every write and every keyword/category read.
///
/// Runs before the handler; a missing or failing token stops the request
/// here with `AuthorizationFailed`, so the handler and the record store are
/// never reached.
pub async fn token_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let header_name = &state.config.security.token_header;
    match authorize(request.headers(), header_name, &state.tokens) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                reason = %err,
                "Token gate rejected request"
            );
            err.into_response()
        }
    }
}

/// Read the token from `header_name` and verify it against the server clock.
pub fn authorize(headers: &HeaderMap, header_name: &str, tokens: &TokenService) -> Result<AuthUser, ApiError> {
    let token = extract_token(headers, header_name).map_err(ApiError::AuthorizationFailed)?;
    let claims = tokens.verify(token).map_err(ApiError::AuthorizationFailed)?;
    Ok(AuthUser::from(claims))
}

fn extract_token<'a>(headers: &'a HeaderMap, header_name: &str) -> Result<&'a str, TokenError> {
    let value = headers.get(header_name).ok_or(TokenError::Missing)?;
    let token = value
        .to_str()
        .map_err(|_| TokenError::Malformed("header is not visible ASCII".to_string()))?
        .trim();
    if token.is_empty() {
        return Err(TokenError::Missing);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::http::HeaderValue;
    use chrono::Utc;

    fn tokens(secret: &str) -> TokenService {
        let mut config = AppConfig::development().security;
        config.jwt_secret = secret.to_string();
        TokenService::new(&config)
    }

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn reason(result: Result<AuthUser, ApiError>) -> TokenError {
        match result {
            Err(ApiError::AuthorizationFailed(reason)) => reason,
            other => panic!("expected AuthorizationFailed, got {:?}", other),
        }
    }

    #[test]
    fn accepts_fresh_token_in_configured_header() {
        let service = tokens("k");
        let token = service.issue("admin", Utc::now().timestamp()).unwrap();
        let user = authorize(&headers("token", &token), "token", &service).unwrap();
        assert_eq!(user.username, "admin");
        assert_eq!(user.expires_at - user.issued_at, service.ttl_secs());
    }

    #[test]
    fn missing_or_blank_header_is_missing() {
        let service = tokens("k");
        assert_eq!(reason(authorize(&HeaderMap::new(), "token", &service)), TokenError::Missing);
        assert_eq!(reason(authorize(&headers("token", "  "), "token", &service)), TokenError::Missing);
    }

    #[test]
    fn token_in_other_header_is_ignored() {
        let service = tokens("k");
        let token = service.issue("admin", Utc::now().timestamp()).unwrap();
        assert_eq!(
            reason(authorize(&headers("authorization", &token), "token", &service)),
            TokenError::Missing
        );
    }

    #[test]
    fn expired_and_foreign_tokens_are_rejected() {
        let service = tokens("k");
        let stale = service.issue("admin", Utc::now().timestamp() - service.ttl_secs() - 1).unwrap();
        assert_eq!(reason(authorize(&headers("token", &stale), "token", &service)), TokenError::Expired);

        let foreign = tokens("other").issue("admin", Utc::now().timestamp()).unwrap();
        assert_eq!(
            reason(authorize(&headers("token", &foreign), "token", &service)),
            TokenError::SignatureMismatch
        );
    }
}
