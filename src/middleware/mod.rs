pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{authorize, token_gate, AuthUser};
pub use extract::{ValidJson, ValidPath, ValidQuery};
pub use response::{ApiResponse, ApiResult};
