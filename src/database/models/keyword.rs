use serde::{Deserialize, Serialize};

use super::{require_id, require_text, Validate};
use crate::error::ApiError;
use crate::filter::IdList;

/// POST /manage/keyword/add
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewKeyword {
    pub keyword: String,
    pub keyword_heavy: Option<String>,
    pub keyword_html: Option<String>,
    pub definition: Option<String>,
    pub industry_definition: Option<String>,
    pub anagram: Option<String>,
    pub group_id: Option<String>,
    pub create_time: Option<String>,
    pub remark: Option<String>,
}

impl Validate for NewKeyword {
    fn validate(&self) -> Result<(), ApiError> {
        require_text("keyword", &self.keyword)
    }
}

/// PUT /manage/keyword/put: move several keywords into one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub id: Vec<i64>,
    pub group_id: String,
}

impl GroupAssignment {
    pub fn ids(&self) -> Result<IdList, ApiError> {
        Ok(IdList::new(self.id.clone())?)
    }
}

impl Validate for GroupAssignment {
    fn validate(&self) -> Result<(), ApiError> {
        self.ids()?;
        require_text("group_id", &self.group_id)
    }
}

/// DELETE /manage/keyword/delete body: a bare JSON array of ids
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordIds(pub Vec<i64>);

impl KeywordIds {
    pub fn ids(&self) -> Result<IdList, ApiError> {
        Ok(IdList::new(self.0.clone())?)
    }
}

impl Validate for KeywordIds {
    fn validate(&self) -> Result<(), ApiError> {
        self.ids().map(|_| ())
    }
}

/// PUT /manage/keyword/remark. An empty remark clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemarkUpdate {
    pub id: i64,
    pub remark: String,
}

impl Validate for RemarkUpdate {
    fn validate(&self) -> Result<(), ApiError> {
        require_id(self.id)
    }
}

/// Keyword joined with its category name, as read back for export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRow {
    pub id: i64,
    pub keyword: String,
    pub keyword_heavy: Option<String>,
    pub keyword_html: Option<String>,
    pub definition: Option<String>,
    pub industry_definition: Option<String>,
    pub anagram: Option<String>,
    pub group_id: Option<String>,
    pub name: Option<String>,
    pub create_time: Option<String>,
    pub remark: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bulk_ids_must_be_non_empty() {
        let ids: KeywordIds = serde_json::from_value(json!([])).unwrap();
        assert!(ids.validate().is_err());
        let ids: KeywordIds = serde_json::from_value(json!([3, 1, 2])).unwrap();
        assert_eq!(ids.ids().unwrap().ids(), &[3, 1, 2]);
    }

    #[test]
    fn group_assignment_needs_ids_and_group() {
        let body: GroupAssignment = serde_json::from_value(json!({ "id": [1], "group_id": "" })).unwrap();
        assert!(body.validate().is_err());
        let body: GroupAssignment = serde_json::from_value(json!({ "id": [], "group_id": "g" })).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn keyword_row_tolerates_missing_join() {
        let row: KeywordRow = serde_json::from_value(json!({ "id": 4, "keyword": "cat", "name": null })).unwrap();
        assert_eq!(row.name, None);
        assert_eq!(row.keyword, "cat");
    }
}
