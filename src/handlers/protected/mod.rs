// handlers/protected/mod.rs - Handlers behind the token gate
//
// Every route here is registered with `token_gate` as a route layer; a request
// without a valid token never reaches these functions.

pub mod category;
pub mod color;
pub mod download;
pub mod keyword;

pub use color::activate as color_activate;
pub use color::add as color_add;
pub use color::delete as color_delete;
pub use color::update as color_update;

pub use keyword::add as keyword_add;
pub use keyword::assign_group as keyword_assign_group;
pub use keyword::by_id as keyword_by_id;
pub use keyword::delete as keyword_delete;
pub use keyword::delete_many as keyword_delete_many;
pub use keyword::list as keyword_list;
pub use keyword::remark as keyword_remark;

pub use category::add as category_add;
pub use category::delete as category_delete;
pub use category::list as category_list;

pub use download::post as download_post;
