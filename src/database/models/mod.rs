pub mod category;
pub mod color;
pub mod keyword;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::filter::{blank_as_none, KeywordFilter};

pub use category::CategoryUpsert;
pub use color::{ActiveColor, ColorUpdate, NewColor};
pub use keyword::{GroupAssignment, KeywordIds, KeywordRow, NewKeyword, RemarkUpdate};

pub const COLOR_TABLE: &str = "home_colortable";
pub const KEYWORD_TABLE: &str = "home_keywordtable";
pub const CATEGORY_TABLE: &str = "home_categorytable";

/// Field-level checks run by the request extractors after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// `page` / `size` query parameters for plain table listings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub size: Option<i64>,
}

impl Validate for PageQuery {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

// Field checks happen when the filter is composed
impl Validate for KeywordFilter {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Positive integer primary key taken from a path or query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub i64);

impl Validate for RowId {
    fn validate(&self) -> Result<(), ApiError> {
        require_id(self.0)
    }
}

/// `?id=` query parameter
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

impl Validate for IdQuery {
    fn validate(&self) -> Result<(), ApiError> {
        require_id(self.id)
    }
}

pub(crate) fn require_id(id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!("invalid id {}", id)));
    }
    Ok(())
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Current time in the ISO-8601 form stored in `create_time` columns
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_ids_must_be_positive() {
        assert!(RowId(1).validate().is_ok());
        assert!(RowId(0).validate().is_err());
        assert!(IdQuery { id: -3 }.validate().is_err());
    }

    #[test]
    fn timestamps_are_utc_millis() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }
}
