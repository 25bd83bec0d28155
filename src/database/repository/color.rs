use serde_json::{json, Value};

use super::{Listing, Repository};
use crate::database::manager::DatabaseError;
use crate::database::models::{now_timestamp, ColorUpdate, NewColor, COLOR_TABLE};
use crate::filter::{Pagination, SqlResult};

impl Repository {
    pub async fn list_colors(&self, page: Pagination) -> Result<Listing, DatabaseError> {
        self.list_table(COLOR_TABLE, page).await
    }

    pub async fn insert_color(&self, color: &NewColor) -> Result<i64, DatabaseError> {
        let create_time = color.create_time.clone().unwrap_or_else(now_timestamp);
        let outcome = self
            .store
            .execute(&SqlResult::new(
                "INSERT INTO home_colortable (color, \"desc\", status, create_time) VALUES (?, ?, ?, ?)",
                vec![
                    json!(color.color),
                    json!(color.desc),
                    json!(color.status.unwrap_or(0)),
                    json!(create_time),
                ],
            ))
            .await?;
        Ok(outcome.last_insert_id)
    }

    pub async fn update_color(&self, color: &ColorUpdate) -> Result<u64, DatabaseError> {
        let outcome = self
            .store
            .execute(&SqlResult::new(
                "UPDATE home_colortable SET color = ?, \"desc\" = COALESCE(?, \"desc\"), status = COALESCE(?, status) WHERE id = ?",
                vec![json!(color.color), json!(color.desc), json!(color.status), json!(color.id)],
            ))
            .await?;
        Ok(outcome.rows_affected)
    }

    /// Marks `id` active and every other color inactive in one statement.
    /// Returns false and changes nothing when `id` does not exist.
    pub async fn activate_color(&self, id: i64) -> Result<bool, DatabaseError> {
        let outcome = self
            .store
            .execute(&SqlResult::new(
                "UPDATE home_colortable SET status = CASE WHEN id = ? THEN 1 ELSE 0 END \
                 WHERE EXISTS (SELECT 1 FROM home_colortable WHERE id = ?)",
                vec![json!(id), json!(id)],
            ))
            .await?;
        Ok(outcome.rows_affected > 0)
    }

    pub async fn delete_color(&self, id: i64) -> Result<u64, DatabaseError> {
        self.delete_by_id(COLOR_TABLE, id).await
    }

    pub async fn active_colors(&self) -> Result<Vec<Value>, DatabaseError> {
        self.store
            .query(&SqlResult::text("SELECT * FROM home_colortable WHERE status = 1"))
            .await
    }
}
