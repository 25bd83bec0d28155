pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::{KeywordInsert, Listing, Repository};
pub use store::{ExecOutcome, RecordStore, SqliteStore};
