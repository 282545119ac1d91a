//! Record types mapped to the gradebook tables

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Student row
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

/// City row
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub region: String,
}

/// Lesson row
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub name: String,
    /// Weekly hours; not range checked
    pub rate: i64,
}

/// Teacher row
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub surname: String,
}

/// Grade record linking a student, lesson, teacher and city.
///
/// Foreign keys are nullable: a student delete under the `nullify` policy
/// leaves its notes behind with `student_id = None`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub student_id: Option<i64>,
    pub lesson_id: Option<i64>,
    pub midterm: i64,
    #[sqlx(rename = "final")]
    pub final_score: i64,
    pub teacher_id: Option<i64>,
    pub city_id: Option<i64>,
}

/// Input for a new grade record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub student_id: i64,
    pub lesson_id: i64,
    pub midterm: i64,
    pub final_score: i64,
    pub teacher_id: i64,
    pub city_id: i64,
}

/// Input for a new student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub surname: String,
}

impl NewStudent {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
        }
    }
}

/// A student together with all of their grade records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentNotes {
    pub student: Student,
    pub notes: Vec<Note>,
}

/// Mean scores for one lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonAverage {
    pub lesson: Lesson,
    pub avg_midterm: f64,
    pub avg_final: f64,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.surname)
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.region)
    }
}

impl fmt::Display for Lesson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.rate)
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.surname)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notes(student={}, lesson={}, midterm={}, final={}, teacher={}, city={})",
            RefId(self.student_id),
            RefId(self.lesson_id),
            self.midterm,
            self.final_score,
            RefId(self.teacher_id),
            RefId(self.city_id),
        )
    }
}

/// Nullable foreign key, rendered as `none` when cleared
struct RefId(Option<i64>);

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{}", id),
            None => f.write_str("none"),
        }
    }
}
