// handlers/mod.rs - HTTP handlers
//
// tenant: directory CRUD, no tenant header
// user:   tenant-scoped CRUD routed through the session resolver
// health: runtime and connection health

pub mod health;
pub mod tenant;
pub mod user;

pub use health::{health, root};
