use serde_json::json;

use crate::config::FilterConfig;

use super::error::FilterError;
use super::filter_order::{FilterOrder, SortField};
use super::filter_where::FilterWhere;
use super::types::{KeywordFilter, SqlFragment, SqlResult};

pub const KEYWORD_SELECT: &str =
    "SELECT hk.*, hc.name FROM home_keywordtable hk LEFT JOIN home_categorytable hc ON hk.group_id = hc.uuid";
pub const KEYWORD_COUNT: &str = "SELECT COUNT(*) AS count FROM home_keywordtable hk";

/// 1-based page number and page size, resolved against configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub size: i64,
}

impl Pagination {
    pub fn resolve(page: Option<i64>, size: Option<i64>, config: &FilterConfig) -> Result<Self, FilterError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(FilterError::InvalidPage(page));
        }

        let size = size.unwrap_or(config.default_page_size);
        if size < 1 {
            return Err(FilterError::InvalidPageSize(size));
        }
        let size = if size > config.max_page_size {
            tracing::warn!("Page size {} exceeds max {}, capping to max", size, config.max_page_size);
            config.max_page_size
        } else {
            size
        };

        Ok(Self { page, size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        self.size
    }

    /// SQLite reads `LIMIT a, b` as offset `a`, count `b`.
    pub fn fragment(&self) -> SqlFragment {
        SqlFragment::new("LIMIT ?, ?", vec![json!(self.offset()), json!(self.limit())])
    }
}

/// One step of the composed keyword query. Built in a fixed order.
#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Where(SqlFragment),
    Order(SortField),
    Page(Pagination),
}

/// Composes the listing, count and export queries over the keyword table
/// from a [`KeywordFilter`].
#[derive(Debug, Clone)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Validates every field up front; a bad sort field or page never
    /// produces partial SQL.
    pub fn new(filter: &KeywordFilter, config: &FilterConfig) -> Result<Self, FilterError> {
        let mut clauses = Vec::new();

        if let Some(group_id) = present(&filter.group_id) {
            clauses.push(Clause::Where(FilterWhere::group_id(group_id)));
        }
        if let Some(keyword) = present(&filter.keyword) {
            clauses.push(Clause::Where(FilterWhere::keyword_contains(keyword)));
        }
        if let Some(range) = FilterWhere::created_between(
            present(&filter.start_time).map(str::trim),
            present(&filter.end_time).map(str::trim),
        )? {
            clauses.push(Clause::Where(range));
        }
        if let Some(sort) = present(&filter.sort) {
            clauses.push(Clause::Order(sort.parse()?));
        }
        clauses.push(Clause::Page(Pagination::resolve(filter.page, filter.size, config)?));

        Ok(Self { clauses })
    }

    pub fn pagination(&self) -> Option<Pagination> {
        self.clauses.iter().find_map(|c| match c {
            Clause::Page(p) => Some(*p),
            _ => None,
        })
    }

    /// Filtered, sorted, paginated row query
    pub fn to_sql(&self) -> SqlResult {
        self.compose(KEYWORD_SELECT, true, true)
    }

    /// Row count over the same filters; never sorted or paginated
    pub fn to_count_sql(&self) -> SqlResult {
        self.compose(KEYWORD_COUNT, false, false)
    }

    /// Every matching row in listing order, for spreadsheet export
    pub fn to_export_sql(&self) -> SqlResult {
        self.compose(KEYWORD_SELECT, true, false)
    }

    fn compose(&self, base: &str, with_order: bool, with_page: bool) -> SqlResult {
        let mut parts = vec![base.to_string()];
        let mut params = Vec::new();

        let conditions: Vec<&SqlFragment> = self
            .clauses
            .iter()
            .filter_map(|c| match c {
                Clause::Where(fragment) => Some(fragment),
                _ => None,
            })
            .collect();
        if !conditions.is_empty() {
            let text: Vec<&str> = conditions.iter().map(|f| f.text.as_str()).collect();
            parts.push(format!("WHERE {}", text.join(" AND ")));
            for fragment in conditions {
                params.extend(fragment.params.iter().cloned());
            }
        }

        for clause in &self.clauses {
            let fragment = match clause {
                Clause::Order(field) if with_order => FilterOrder::generate(*field),
                Clause::Page(page) if with_page => page.fragment(),
                _ => continue,
            };
            parts.push(fragment.text);
            params.extend(fragment.params);
        }

        SqlResult::new(parts.join(" "), params)
    }
}

/// The value as given, or `None` when it is absent or whitespace only.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
