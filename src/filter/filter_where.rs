use serde_json::{json, Value};

use super::error::FilterError;
use super::types::SqlFragment;

/// Condition builders for the keyword table (aliased `hk`). Each returns a
/// condition without the leading WHERE/AND and exactly one value per `?`.
pub struct FilterWhere;

impl FilterWhere {
    pub fn group_id(group_id: &str) -> SqlFragment {
        SqlFragment::new("hk.group_id = ?", vec![json!(group_id)])
    }

    pub fn keyword_contains(keyword: &str) -> SqlFragment {
        SqlFragment::new("hk.keyword LIKE ?", vec![json!(format!("%{}%", keyword))])
    }

    pub fn created_between(start: Option<&str>, end: Option<&str>) -> Result<Option<SqlFragment>, FilterError> {
        Ok(match (start, end) {
            (Some(start), Some(end)) => {
                if start > end {
                    return Err(FilterError::InvalidTimeRange {
                        start: start.to_string(),
                        end: end.to_string(),
                    });
                }
                Some(SqlFragment::new(
                    "hk.create_time BETWEEN ? AND ?",
                    vec![json!(start), json!(end)],
                ))
            }
            (Some(start), None) => Some(SqlFragment::new("hk.create_time >= ?", vec![json!(start)])),
            (None, Some(end)) => Some(SqlFragment::new("hk.create_time <= ?", vec![json!(end)])),
            (None, None) => None,
        })
    }
}

/// Non-empty list of positive row ids, bound one placeholder per id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList(Vec<i64>);

impl IdList {
    pub fn new(ids: Vec<i64>) -> Result<Self, FilterError> {
        if ids.is_empty() {
            return Err(FilterError::EmptyIdList);
        }
        if let Some(bad) = ids.iter().find(|id| **id <= 0) {
            return Err(FilterError::InvalidId(*bad));
        }
        Ok(Self(ids))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[i64] {
        &self.0
    }

    /// `<column> IN (?, ?, ...)` in input order. `column` must be a constant.
    pub fn in_clause(&self, column: &str) -> SqlFragment {
        let placeholders = vec!["?"; self.0.len()].join(", ");
        let params: Vec<Value> = self.0.iter().map(|id| json!(id)).collect();
        SqlFragment::new(format!("{} IN ({})", column, placeholders), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_is_wrapped_in_wildcards() {
        let fragment = FilterWhere::keyword_contains("cat");
        assert_eq!(fragment.params, vec![json!("%cat%")]);
    }

    #[test]
    fn hostile_values_stay_in_params() {
        let fragment = FilterWhere::group_id("x' OR '1'='1");
        assert_eq!(fragment.text, "hk.group_id = ?");
        assert_eq!(fragment.params, vec![json!("x' OR '1'='1")]);
    }

    #[test]
    fn time_range_shapes() {
        let both = FilterWhere::created_between(Some("2024-01-01"), Some("2024-02-01")).unwrap().unwrap();
        assert_eq!(both.text, "hk.create_time BETWEEN ? AND ?");
        assert_eq!(both.params, vec![json!("2024-01-01"), json!("2024-02-01")]);

        let start = FilterWhere::created_between(Some("2024-01-01"), None).unwrap().unwrap();
        assert_eq!(start.params.len(), 1);

        assert!(FilterWhere::created_between(None, None).unwrap().is_none());
        assert!(FilterWhere::created_between(Some("2024-03-01"), Some("2024-02-01")).is_err());
    }

    #[test]
    fn id_list_binds_each_id_in_order() {
        let ids = IdList::new(vec![7, 3, 11, 5]).unwrap();
        let fragment = ids.in_clause("id");
        assert_eq!(fragment.text, "id IN (?, ?, ?, ?)");
        assert_eq!(fragment.params, vec![json!(7), json!(3), json!(11), json!(5)]);
        assert_eq!(fragment.text.matches('?').count(), ids.len());
    }

    #[test]
    fn id_list_rejects_empty_and_non_positive() {
        assert_eq!(IdList::new(vec![]), Err(FilterError::EmptyIdList));
        assert_eq!(IdList::new(vec![1, 0]), Err(FilterError::InvalidId(0)));
        assert_eq!(IdList::new(vec![-4]), Err(FilterError::InvalidId(-4)));
    }
}
