use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the record store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Statement has {placeholders} placeholders but {params} bound values")]
    ParamMismatch { placeholders: usize, params: usize },

    #[error("Unsupported parameter value: {0}")]
    UnsupportedParam(String),

    #[error("Statement timed out after {0} ms")]
    Timeout(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const SCHEMA: &str = include_str!("schema.sql");

/// Builds and prepares the SQLite pool behind the record store
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
        let options = SqliteConnectOptions::from_str(&config.url)?;

        // Every connection to an in-memory URL opens a fresh database, so keep
        // exactly one and never recycle it.
        let pool = if Self::is_in_memory(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_millis(config.statement_timeout_ms))
                .connect_with(options)
                .await?
        };

        info!("Created database pool for: {}", config.url);
        Ok(pool)
    }

    /// Create the three tables if they do not exist yet
    pub async fn init_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
        for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(statement).execute(pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn is_in_memory(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn detects_in_memory_urls() {
        assert!(DatabaseManager::is_in_memory("sqlite::memory:"));
        assert!(DatabaseManager::is_in_memory("sqlite://file.db?mode=memory"));
        assert!(!DatabaseManager::is_in_memory("sqlite://manage.db?mode=rwc"));
    }

    #[tokio::test]
    async fn schema_creates_tables() {
        let mut config = AppConfig::development().database;
        config.url = "sqlite::memory:".to_string();
        let pool = DatabaseManager::connect(&config).await.unwrap();
        DatabaseManager::init_schema(&pool).await.unwrap();
        // Idempotent
        DatabaseManager::init_schema(&pool).await.unwrap();

        for table in ["home_colortable", "home_keywordtable", "home_categorytable"] {
            let sql = format!("SELECT COUNT(*) FROM {}", table);
            let count: (i64,) = sqlx::query_as(&sql).fetch_one(&pool).await.unwrap();
            assert_eq!(count.0, 0);
        }
        DatabaseManager::health_check(&pool).await.unwrap();
    }
}
