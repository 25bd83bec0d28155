use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_id, require_text, Validate};
use crate::error::ApiError;

/// POST /manage/category/add: insert without `id`, update with one
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryUpsert {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: String,
    pub create_time: Option<String>,
}

impl Validate for CategoryUpsert {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(id) = self.id {
            require_id(id)?;
        }
        require_text("name", &self.name)
    }
}

/// Opaque group identifier referenced by `home_keywordtable.group_id`
pub fn generate_category_uuid() -> String {
    Uuid::new_v4().simple().to_string()
}
