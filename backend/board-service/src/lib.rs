/// Board Service Library
///
/// A community board backend: session-cookie authentication, posts and
/// comments, like toggling, and per-field edit history.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for users, posts, comments and audit rows
/// - `services`: Business logic layer, including the diff-and-audit engine
/// - `db`: Database access layer and repositories
/// - `middleware`: Session-cookie authentication
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
