use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use manage_api::config::AppConfig;
use manage_api::database::{DatabaseManager, SqliteStore};
use manage_api::export::ObjectStoreSink;
use manage_api::{router, AppState};

#[derive(Debug, Parser)]
#[command(name = "manage-api", version, about = "Admin API for colours, keywords and categories")]
struct Args {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Create missing tables before serving
    #[arg(long)]
    init_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = args.port {
        config.api.port = port;
    }
    tracing::info!("Starting manage-api in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;
    if args.init_schema {
        DatabaseManager::init_schema(&pool).await.context("failed to create tables")?;
        tracing::info!("Schema ensured");
    }
    let store = Arc::new(SqliteStore::new(pool, &config.database));
    let exports = Arc::new(ObjectStoreSink::from_config(&config.export).context("failed to open export store")?);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let app = router(AppState::new(config, store, exports));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("manage-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
