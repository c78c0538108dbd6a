pub mod clerk_auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod server;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
