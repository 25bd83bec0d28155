// handlers/public/mod.rs - Handlers reachable without a token
//
// Login, the colour list (read by the public site), export download and the
// health probe. Everything else sits behind the token gate in `protected`.

pub mod color;
pub mod download;
pub mod health;
pub mod login;

pub use color::list as color_list;
pub use download::get as download_get;
pub use health::get as health;
pub use login::get as login;
