/// Hoot Service Library
///
/// REST backend for the hoot micro-post application: authenticated users
/// publish hoots and comment on them, with ownership-based edit/delete
/// authorization. Comments live inside their parent hoot and are only ever
/// persisted as part of that aggregate.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Hoots, comments, categories, request payloads
/// - `services`: Business logic (mutation service, ownership guard)
/// - `db`: Hoot store trait, Postgres implementation, startup schema
/// - `middleware`: Bearer-token authentication
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
