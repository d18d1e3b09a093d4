pub mod health;
pub mod tenant;
pub mod user;
