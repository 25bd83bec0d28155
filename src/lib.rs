pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod filter;
pub mod handlers;
pub mod middleware;

pub use app::{router, AppState};
