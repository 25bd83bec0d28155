use serde_json::json;

use super::{Listing, Repository};
use crate::database::manager::DatabaseError;
use crate::database::models::category::generate_category_uuid;
use crate::database::models::{now_timestamp, CategoryUpsert, CATEGORY_TABLE};
use crate::filter::{Pagination, SqlResult};

impl Repository {
    pub async fn list_categories(&self, page: Pagination) -> Result<Listing, DatabaseError> {
        self.list_table(CATEGORY_TABLE, page).await
    }

    /// Inserts when `id` is absent, otherwise updates that row. Returns the
    /// category's uuid (generated on insert; an update without one keeps the stored value).
    pub async fn upsert_category(&self, category: &CategoryUpsert) -> Result<String, DatabaseError> {
        let create_time = category.create_time.clone().unwrap_or_else(now_timestamp);

        match category.id {
            None => {
                let uuid = category.uuid.clone().unwrap_or_else(generate_category_uuid);
                self.store
                    .execute(&SqlResult::new(
                        "INSERT INTO home_categorytable (uuid, name, create_time) VALUES (?, ?, ?)",
                        vec![json!(uuid), json!(category.name), json!(create_time)],
                    ))
                    .await?;
                Ok(uuid)
            }
            Some(id) => {
                let outcome = self
                    .store
                    .execute(&SqlResult::new(
                        "UPDATE home_categorytable SET uuid = COALESCE(?, uuid), name = ?, create_time = ? WHERE id = ?",
                        vec![json!(category.uuid), json!(category.name), json!(create_time), json!(id)],
                    ))
                    .await?;
                if outcome.rows_affected == 0 {
                    return Err(DatabaseError::NotFound(format!("category {}", id)));
                }
                let rows = self
                    .store
                    .query(&SqlResult::new("SELECT uuid FROM home_categorytable WHERE id = ?", vec![json!(id)]))
                    .await?;
                rows.first()
                    .and_then(|row| row.get("uuid"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| DatabaseError::NotFound(format!("category {}", id)))
            }
        }
    }

    pub async fn delete_category(&self, id: i64) -> Result<u64, DatabaseError> {
        self.delete_by_id(CATEGORY_TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{page, repository};
    use super::*;

    #[tokio::test]
    async fn insert_generates_uuid() {
        let repo = repository().await;
        let uuid = repo
            .upsert_category(&CategoryUpsert { name: "fruit".to_string(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(uuid.len(), 32);

        let listing = repo.list_categories(page(1, 10)).await.unwrap();
        assert_eq!(listing.total, 1);
        assert_eq!(listing.result[0]["uuid"], uuid.as_str());
    }

    #[tokio::test]
    async fn update_by_id_keeps_uuid_when_omitted() {
        let repo = repository().await;
        let uuid = repo
            .upsert_category(&CategoryUpsert { name: "fruit".to_string(), ..Default::default() })
            .await
            .unwrap();
        let kept = repo
            .upsert_category(&CategoryUpsert { id: Some(1), name: "fruits".to_string(), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(kept, uuid);

        let listing = repo.list_categories(page(1, 10)).await.unwrap();
        assert_eq!(listing.result[0]["name"], "fruits");
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let repo = repository().await;
        let err = repo
            .upsert_category(&CategoryUpsert { id: Some(7), name: "x".to_string(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        assert_eq!(repo.delete_category(7).await.unwrap(), 0);
    }
}
