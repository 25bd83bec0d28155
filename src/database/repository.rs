mod category;
mod color;
mod keyword;

pub use keyword::KeywordInsert;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::database::manager::DatabaseError;
use crate::database::store::RecordStore;
use crate::filter::{Pagination, SqlResult};

/// One page of rows plus the unpaginated row count
#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    pub result: Vec<Value>,
    pub total: i64,
}

/// Table-level operations over the three managed tables. Every statement goes
/// through the [`RecordStore`] with bound parameters.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn RecordStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// `SELECT * FROM <table>` paged, with a separate COUNT. `table` must be a constant.
    async fn list_table(&self, table: &str, page: Pagination) -> Result<Listing, DatabaseError> {
        let limit = page.fragment();
        let rows = self
            .store
            .query(&SqlResult::new(format!("SELECT * FROM {} {}", table, limit.text), limit.params))
            .await?;
        let total = self
            .count(&SqlResult::text(format!("SELECT COUNT(*) AS count FROM {}", table)))
            .await?;
        Ok(Listing { result: rows, total })
    }

    async fn count(&self, sql: &SqlResult) -> Result<i64, DatabaseError> {
        let rows = self.store.query(sql).await?;
        rows.first()
            .and_then(|row| row.get("count"))
            .and_then(Value::as_i64)
            .ok_or(DatabaseError::Sqlx(sqlx::Error::RowNotFound))
    }

    async fn delete_by_id(&self, table: &str, id: i64) -> Result<u64, DatabaseError> {
        let outcome = self
            .store
            .execute(&SqlResult::new(
                format!("DELETE FROM {} WHERE id = ?", table),
                vec![id.into()],
            ))
            .await?;
        Ok(outcome.rows_affected)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::store::SqliteStore;
    use crate::database::DatabaseManager;

    pub(crate) async fn repository() -> Repository {
        let mut config = AppConfig::development().database;
        config.url = "sqlite::memory:".to_string();
        let pool = DatabaseManager::connect(&config).await.unwrap();
        DatabaseManager::init_schema(&pool).await.unwrap();
        Repository::new(Arc::new(SqliteStore::new(pool, &config)))
    }

    pub(crate) fn page(page: i64, size: i64) -> Pagination {
        Pagination { page, size }
    }
}
