//! Film catalog service library.
//!
//! Paginated, filterable list endpoints behind per-client token-bucket
//! admission control.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod query;
pub mod security;
pub mod store;

pub use config::schema::ServiceConfig;
pub use error::AppError;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
