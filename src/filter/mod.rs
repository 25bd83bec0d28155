pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod error;

pub use error::FilterError;
pub use filter::{Filter, Pagination, KEYWORD_COUNT, KEYWORD_SELECT};
pub use filter_order::SortField;
pub use filter_where::{FilterWhere, IdList};
pub use types::*;
