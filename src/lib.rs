//! Gradebook library

pub mod app;
pub mod database;
pub mod utils;

// Re-export main types for easier use
pub use database::{create_session, RecordStore};
pub use utils::{Config, DatabaseConfig, DeletePolicy, GradebookError};
