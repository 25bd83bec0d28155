use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unsupported sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid page: {0}")]
    InvalidPage(i64),

    #[error("Invalid page size: {0}")]
    InvalidPageSize(i64),

    #[error("Invalid time range: {start} is after {end}")]
    InvalidTimeRange { start: String, end: String },

    #[error("Id list must not be empty")]
    EmptyIdList,

    #[error("Invalid id: {0}")]
    InvalidId(i64),
}
