use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{CredentialVerifier, TokenService};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::{RecordStore, Repository};
use crate::export::ExportSink;
use crate::handlers::{protected, public};
use crate::middleware::token_gate;

/// Shared by every handler. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub credentials: CredentialVerifier,
    pub tokens: TokenService,
    pub repository: Repository,
    pub exports: Arc<dyn ExportSink>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn RecordStore>, exports: Arc<dyn ExportSink>) -> Self {
        Self {
            credentials: CredentialVerifier::new(&config.security),
            tokens: TokenService::new(&config.security),
            repository: Repository::new(store),
            exports,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/manage/login", get(public::login))
        .route("/manage/color/list", get(public::color_list))
        .route("/manage/download", get(public::download_get))
        .route("/health", get(public::health));

    let gated_routes = Router::new()
        .route("/manage/color/add", post(protected::color_add))
        .route("/manage/color/update", put(protected::color_update))
        .route("/manage/color/setColor", put(protected::color_activate))
        .route("/manage/color/:id", delete(protected::color_delete))
        .route("/manage/keyword/list", get(protected::keyword_list))
        .route("/manage/keyword/add", post(protected::keyword_add))
        .route("/manage/keyword/put", put(protected::keyword_assign_group))
        .route("/manage/keyword/delete", delete(protected::keyword_delete_many))
        .route("/manage/keyword/remark", put(protected::keyword_remark))
        .route("/manage/keyword/byId", get(protected::keyword_by_id))
        .route("/manage/keyword/:id", delete(protected::keyword_delete))
        .route("/manage/category/list", get(protected::category_list))
        .route("/manage/category/add", post(protected::category_add))
        .route("/manage/category/:id", delete(protected::category_delete))
        .route("/manage/download", post(protected::download_post))
        .route_layer(from_fn_with_state(state.clone(), token_gate));

    let cors = cors_layer(&state.config.security);

    Router::new()
        .merge(public_routes)
        .merge(gated_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Mirrors the caller's origin and requested headers unless an explicit origin list is configured.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origin = if security.cors_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
