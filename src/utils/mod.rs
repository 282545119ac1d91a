//! Utility modules for error handling and configuration

pub mod config;
pub mod error;
pub mod paths;

// Re-export for convenience
pub use config::{Config, DatabaseConfig, DeletePolicy};
pub use error::GradebookError;
pub use paths::{default_database_url, ensure_data_dir, get_data_dir, get_database_path};
