//! Error handling for Gradebook

use thiserror::Error;

/// Main error type for Gradebook
#[derive(Debug, Error)]
pub enum GradebookError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Student {student_id} is still referenced by {notes} note(s)")]
    StillReferenced { student_id: i64, notes: i64 },
}

pub type Result<T> = std::result::Result<T, GradebookError>;
