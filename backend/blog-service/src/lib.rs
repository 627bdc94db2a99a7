/// Blog Service Library
///
/// Turns a topic into a stored post through a hosted text-generation model,
/// and a reader comment into a stored, sentiment-labeled record through a
/// local classification model.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Posts, comments, and the sentiment vocabulary
/// - `providers`: Text generation and sentiment classification capabilities
/// - `services`: The generation and classification pipeline
/// - `db`: SQLite schema and the content store
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod openapi;
pub mod providers;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
