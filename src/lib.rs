pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod services;
pub mod session;
pub mod state;

pub use app::app;
pub use state::AppState;
