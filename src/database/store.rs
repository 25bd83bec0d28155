use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::time::timeout;

use crate::config::DatabaseConfig;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::{build_query, row_to_json};
use crate::filter::types::SqlResult;

/// Acknowledgement for a write statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecOutcome {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Executes parameterized statements. Each call is one statement.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run a read and return each row as a JSON object
    async fn query(&self, sql: &SqlResult) -> Result<Vec<Value>, DatabaseError>;

    /// Run a write
    async fn execute(&self, sql: &SqlResult) -> Result<ExecOutcome, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct SqliteStore {
    pool: SqlitePool,
    timeout: Duration,
    log_queries: bool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            timeout: Duration::from_millis(config.statement_timeout_ms),
            log_queries: config.enable_query_logging,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    fn log(&self, sql: &SqlResult, started: Instant) {
        if self.log_queries {
            tracing::debug!(
                query = %sql.query,
                params = sql.params.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "statement executed"
            );
        }
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn query(&self, sql: &SqlResult) -> Result<Vec<Value>, DatabaseError> {
        let started = Instant::now();
        let q = build_query(sql)?;
        let rows = timeout(self.timeout, q.fetch_all(&self.pool))
            .await
            .map_err(|_| DatabaseError::Timeout(self.timeout_ms()))??;
        self.log(sql, started);
        rows.iter().map(row_to_json).collect()
    }

    async fn execute(&self, sql: &SqlResult) -> Result<ExecOutcome, DatabaseError> {
        let started = Instant::now();
        let q = build_query(sql)?;
        let result = timeout(self.timeout, q.execute(&self.pool))
            .await
            .map_err(|_| DatabaseError::Timeout(self.timeout_ms()))??;
        self.log(sql, started);
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        timeout(self.timeout, DatabaseManager::health_check(&self.pool))
            .await
            .map_err(|_| DatabaseError::Timeout(self.timeout_ms()))?
    }
}
