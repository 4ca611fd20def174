pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod supabase;

pub use routes::{app, AppState};
