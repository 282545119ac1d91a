//! Database module

pub mod models;
pub mod operations;
pub mod reports;
pub mod schema;

// Re-export for convenience
pub use models::{City, Lesson, LessonAverage, NewNote, NewStudent, Note, Student, StudentNotes, Teacher};
pub use operations::RecordStore;
pub use schema::{create_session, initialize_database};
