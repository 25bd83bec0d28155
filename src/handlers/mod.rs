// handlers/mod.rs - Two handler tiers
//
// public:    no token (login, colour list, download, health)
// protected: token gate applied as a route layer in `app::router`

pub mod protected;
pub mod public;
