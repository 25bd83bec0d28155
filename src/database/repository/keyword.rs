use serde_json::{json, Value};

use super::{Listing, Repository};
use crate::database::manager::DatabaseError;
use crate::database::models::{now_timestamp, NewKeyword, KEYWORD_TABLE};
use crate::filter::{Filter, IdList, SqlResult, KEYWORD_SELECT};

/// Result of a keyword insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordInsert {
    Created(i64),
    Exists(i64),
}

impl Repository {
    /// Filtered page plus the count over the same filters
    pub async fn list_keywords(&self, filter: &Filter) -> Result<Listing, DatabaseError> {
        let result = self.store.query(&filter.to_sql()).await?;
        let total = self.count(&filter.to_count_sql()).await?;
        Ok(Listing { result, total })
    }

    pub async fn find_keyword_id(&self, keyword: &str) -> Result<Option<i64>, DatabaseError> {
        let rows = self
            .store
            .query(&SqlResult::new(
                "SELECT id FROM home_keywordtable WHERE keyword = ? LIMIT 1",
                vec![json!(keyword)],
            ))
            .await?;
        Ok(rows.first().and_then(|row| row.get("id")).and_then(Value::as_i64))
    }

    // Check-then-insert; the table carries no unique constraint on `keyword`.
    pub async fn insert_keyword(&self, keyword: &NewKeyword) -> Result<KeywordInsert, DatabaseError> {
        if let Some(id) = self.find_keyword_id(&keyword.keyword).await? {
            return Ok(KeywordInsert::Exists(id));
        }

        let create_time = keyword.create_time.clone().unwrap_or_else(now_timestamp);
        let outcome = self
            .store
            .execute(&SqlResult::new(
                "INSERT INTO home_keywordtable \
                 (keyword, keyword_heavy, keyword_html, definition, industry_definition, anagram, group_id, create_time, remark) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                vec![
                    json!(keyword.keyword),
                    json!(keyword.keyword_heavy),
                    json!(keyword.keyword_html),
                    json!(keyword.definition),
                    json!(keyword.industry_definition),
                    json!(keyword.anagram),
                    json!(keyword.group_id),
                    json!(create_time),
                    json!(keyword.remark),
                ],
            ))
            .await?;
        Ok(KeywordInsert::Created(outcome.last_insert_id))
    }

    pub async fn assign_group(&self, ids: &IdList, group_id: &str) -> Result<u64, DatabaseError> {
        let condition = ids.in_clause("id");
        let mut params = vec![json!(group_id)];
        params.extend(condition.params);
        let outcome = self
            .store
            .execute(&SqlResult::new(
                format!("UPDATE home_keywordtable SET group_id = ? WHERE {}", condition.text),
                params,
            ))
            .await?;
        Ok(outcome.rows_affected)
    }

    pub async fn delete_keywords(&self, ids: &IdList) -> Result<u64, DatabaseError> {
        let condition = ids.in_clause("id");
        let outcome = self
            .store
            .execute(&SqlResult::new(
                format!("DELETE FROM home_keywordtable WHERE {}", condition.text),
                condition.params,
            ))
            .await?;
        Ok(outcome.rows_affected)
    }

    pub async fn delete_keyword(&self, id: i64) -> Result<u64, DatabaseError> {
        self.delete_by_id(KEYWORD_TABLE, id).await
    }

    pub async fn update_remark(&self, id: i64, remark: &str) -> Result<u64, DatabaseError> {
        let outcome = self
            .store
            .execute(&SqlResult::new(
                "UPDATE home_keywordtable SET remark = ? WHERE id = ?",
                vec![json!(remark), json!(id)],
            ))
            .await?;
        Ok(outcome.rows_affected)
    }

    /// Joined row for one keyword; empty when absent
    pub async fn keyword_by_id(&self, id: i64) -> Result<Vec<Value>, DatabaseError> {
        self.store
            .query(&SqlResult::new(format!("{} WHERE hk.id = ?", KEYWORD_SELECT), vec![json!(id)]))
            .await
    }

    /// Joined rows for exactly these ids, in id order
    pub async fn keywords_by_ids(&self, ids: &IdList) -> Result<Vec<Value>, DatabaseError> {
        let condition = ids.in_clause("hk.id");
        self.store
            .query(&SqlResult::new(
                format!("{} WHERE {} ORDER BY hk.id", KEYWORD_SELECT, condition.text),
                condition.params,
            ))
            .await
    }

    /// Every row matching the filter, sorted, without pagination
    pub async fn export_keywords(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError> {
        self.store.query(&filter.to_export_sql()).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::repository;
    use super::*;
    use crate::config::AppConfig;
    use crate::database::models::{CategoryUpsert, NewKeyword};
    use crate::filter::KeywordFilter;

    fn keyword(word: &str, group: Option<&str>, created: &str) -> NewKeyword {
        NewKeyword {
            keyword: word.to_string(),
            definition: Some(format!("{} means {}", word, word)),
            group_id: group.map(str::to_string),
            create_time: Some(created.to_string()),
            ..Default::default()
        }
    }

    fn filter(f: KeywordFilter) -> Filter {
        Filter::new(&f, &AppConfig::development().filter).unwrap()
    }

    async fn seeded() -> (Repository, String) {
        let repo = repository().await;
        let group = repo
            .upsert_category(&CategoryUpsert { name: "animals".to_string(), ..Default::default() })
            .await
            .unwrap();
        repo.insert_keyword(&keyword("cat", Some(&group), "2024-01-10T00:00:00.000Z")).await.unwrap();
        repo.insert_keyword(&keyword("category", None, "2024-02-10T00:00:00.000Z")).await.unwrap();
        repo.insert_keyword(&keyword("dog", Some(&group), "2024-03-10T00:00:00.000Z")).await.unwrap();
        (repo, group)
    }

    #[tokio::test]
    async fn duplicate_keyword_reports_existing_id() {
        let repo = repository().await;
        let first = repo.insert_keyword(&keyword("apple", None, "2024-01-01")).await.unwrap();
        let KeywordInsert::Created(id) = first else { panic!("expected insert") };
        let second = repo.insert_keyword(&keyword("apple", None, "2024-01-02")).await.unwrap();
        assert_eq!(second, KeywordInsert::Exists(id));
    }

    #[tokio::test]
    async fn listing_applies_filters_to_rows_and_total() {
        let (repo, group) = seeded().await;

        let listing = repo
            .list_keywords(&filter(KeywordFilter { keyword: Some("cat".to_string()), ..Default::default() }))
            .await
            .unwrap();
        assert_eq!(listing.total, 2);

        let listing = repo
            .list_keywords(&filter(KeywordFilter {
                group_id: Some(group.clone()),
                sort: Some("create_time".to_string()),
                size: Some(1),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(listing.total, 2);
        assert_eq!(listing.result.len(), 1);
        assert_eq!(listing.result[0]["keyword"], "dog");
        assert_eq!(listing.result[0]["name"], "animals");
    }

    #[tokio::test]
    async fn time_range_bounds_are_inclusive() {
        let (repo, _) = seeded().await;
        let rows = repo
            .export_keywords(&filter(KeywordFilter {
                start_time: Some("2024-02-01".to_string()),
                sort: Some("keyword".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        let words: Vec<&str> = rows.iter().filter_map(|r| r["keyword"].as_str()).collect();
        assert_eq!(words, vec!["category", "dog"]);
    }

    #[tokio::test]
    async fn bulk_operations_bind_each_id() {
        let (repo, _) = seeded().await;
        let ids = IdList::new(vec![1, 2]).unwrap();
        assert_eq!(repo.assign_group(&ids, "g2").await.unwrap(), 2);
        let rows = repo.keywords_by_ids(&ids).await.unwrap();
        assert!(rows.iter().all(|r| r["group_id"] == "g2"));

        assert_eq!(repo.delete_keywords(&ids).await.unwrap(), 2);
        assert!(repo.keyword_by_id(1).await.unwrap().is_empty());
        assert_eq!(repo.keyword_by_id(3).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remark_updates_single_row() {
        let (repo, _) = seeded().await;
        assert_eq!(repo.update_remark(3, "woof").await.unwrap(), 1);
        assert_eq!(repo.update_remark(99, "ghost").await.unwrap(), 0);
        let rows = repo.keyword_by_id(3).await.unwrap();
        assert_eq!(rows[0]["remark"], "woof");
        assert_eq!(repo.delete_keyword(3).await.unwrap(), 1);
    }
}
