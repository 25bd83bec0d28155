#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;

use manage_api::config::AppConfig;
use manage_api::database::{DatabaseManager, SqliteStore};
use manage_api::export::ObjectStoreSink;
use manage_api::{router, AppState};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "admin-password";
pub const JWT_SECRET: &str = "integration-test-secret";

/// In-process server on its own port, with a fresh in-memory database and
/// export store. Lives as long as the test's runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: Client,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.security.username = USERNAME.to_string();
    config.security.password = PASSWORD.to_string();
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.database.url = "sqlite::memory:".to_string();
    config.database.enable_query_logging = false;
    config.export.store_url = "memory://".to_string();
    config
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        Self::start_with(test_config()).await
    }

    pub async fn start_with(config: AppConfig) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let pool = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::init_schema(&pool).await?;
        let store = Arc::new(SqliteStore::new(pool, &config.database));
        let exports = Arc::new(ObjectStoreSink::from_config(&config.export)?);

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let app = router(AppState::new(config, store, exports));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self { port, base_url, client: Client::new() };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Login with the configured pair and the current client clock
    pub async fn login(&self) -> Result<String> {
        let millis = chrono::Utc::now().timestamp_millis().to_string();
        let body: Value = self
            .client
            .get(self.url("/manage/login"))
            .query(&[("username", USERNAME), ("password", PASSWORD), ("t", millis.as_str())])
            .send()
            .await?
            .json()
            .await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("login returned no token: {}", body))
    }

    /// Request carrying a token in the `token` header
    pub fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client.request(method, self.url(path)).header("token", token)
    }
}

/// Send and decode the JSON body alongside the status
pub async fn send(request: RequestBuilder) -> Result<(StatusCode, Value)> {
    let resp = request.send().await?;
    let status = resp.status();
    let body = resp.json::<Value>().await?;
    Ok((status, body))
}
