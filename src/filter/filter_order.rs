use std::str::FromStr;

use super::error::FilterError;
use super::types::{SortDirection, SqlFragment};

/// Columns a caller may sort keyword listings by. Anything else is rejected
/// before it can reach query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Keyword,
    CreateTime,
    Id,
    GroupId,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Keyword,
        SortField::CreateTime,
        SortField::Id,
        SortField::GroupId,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortField::Keyword => "keyword",
            SortField::CreateTime => "create_time",
            SortField::Id => "id",
            SortField::GroupId => "group_id",
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Keyword => "hk.keyword",
            SortField::CreateTime => "hk.create_time",
            SortField::Id => "hk.id",
            SortField::GroupId => "hk.group_id",
        }
    }

    /// Alphabetical for the keyword itself, newest/largest first for the rest.
    pub fn direction(&self) -> SortDirection {
        match self {
            SortField::Keyword => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

impl FromStr for SortField {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        SortField::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| FilterError::InvalidSortField(wanted.to_string()))
    }
}

pub struct FilterOrder;

impl FilterOrder {
    pub fn generate(field: SortField) -> SqlFragment {
        SqlFragment::new(
            format!("ORDER BY {} {}", field.column(), field.direction().to_sql()),
            vec![],
        )
    }
}
