//! Database CRUD operations

use crate::database::models::{City, Lesson, NewNote, NewStudent, Note, Student, Teacher};
use crate::utils::config::DeletePolicy;
use crate::utils::error::{GradebookError, Result};
use sqlx::{Pool, Sqlite, SqliteConnection};
use tracing::{debug, info, warn};

/// Store for gradebook records.
///
/// Holds a connection pool rather than a connection: each operation checks out
/// a connection (or opens a transaction) and hands it back when it returns,
/// whether it succeeded or not.
#[derive(Clone)]
pub struct RecordStore {
    pool: Pool<Sqlite>,
    delete_policy: DeletePolicy,
}

impl RecordStore {
    /// Create new record store
    pub fn new(pool: Pool<Sqlite>, delete_policy: DeletePolicy) -> Self {
        Self {
            pool,
            delete_policy,
        }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Add a student
    pub async fn add_student(&self, name: &str, surname: &str) -> Result<Student> {
        let mut conn = self.pool.acquire().await?;
        let student = insert_student(&mut *conn, name, surname).await?;

        info!("Added student {}", student.id);
        Ok(student)
    }

    /// Add a city
    pub async fn add_city(&self, name: &str, region: &str) -> Result<City> {
        let city: City = sqlx::query_as(
            "INSERT INTO city (name, region) VALUES (?, ?) RETURNING id, name, region",
        )
        .bind(name)
        .bind(region)
        .fetch_one(&self.pool)
        .await?;

        info!("Added city {}", city.id);
        Ok(city)
    }

    /// Add a lesson
    pub async fn add_lesson(&self, name: &str, rate: i64) -> Result<Lesson> {
        let lesson: Lesson = sqlx::query_as(
            "INSERT INTO lesson (name, rate) VALUES (?, ?) RETURNING id, name, rate",
        )
        .bind(name)
        .bind(rate)
        .fetch_one(&self.pool)
        .await?;

        info!("Added lesson {}", lesson.id);
        Ok(lesson)
    }

    /// Add a teacher
    pub async fn add_teacher(&self, name: &str, surname: &str) -> Result<Teacher> {
        let teacher: Teacher = sqlx::query_as(
            "INSERT INTO teacher (name, surname) VALUES (?, ?) RETURNING id, name, surname",
        )
        .bind(name)
        .bind(surname)
        .fetch_one(&self.pool)
        .await?;

        info!("Added teacher {}", teacher.id);
        Ok(teacher)
    }

    /// Add a grade record. Dangling references are rejected by the database.
    pub async fn add_notes(&self, note: NewNote) -> Result<Note> {
        let note: Note = sqlx::query_as(
            r#"
            INSERT INTO notes (student_id, lesson_id, midterm, final, teacher_id, city_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, student_id, lesson_id, midterm, final, teacher_id, city_id
            "#,
        )
        .bind(note.student_id)
        .bind(note.lesson_id)
        .bind(note.midterm)
        .bind(note.final_score)
        .bind(note.teacher_id)
        .bind(note.city_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Added notes {}", note.id);
        Ok(note)
    }

    /// Get all students in storage order
    pub async fn get_all_students(&self) -> Result<Vec<Student>> {
        let students = sqlx::query_as("SELECT id, name, surname FROM student ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    /// Get student by ID
    pub async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        let student = sqlx::query_as("SELECT id, name, surname FROM student WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    /// Get city by ID
    pub async fn get_city_by_id(&self, id: i64) -> Result<Option<City>> {
        let city = sqlx::query_as("SELECT id, name, region FROM city WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(city)
    }

    pub async fn get_lesson_by_id(&self, id: i64) -> Result<Option<Lesson>> {
        let lesson = sqlx::query_as("SELECT id, name, rate FROM lesson WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lesson)
    }

    /// Get teacher by ID
    pub async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        let teacher = sqlx::query_as("SELECT id, name, surname FROM teacher WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(teacher)
    }

    /// Update a student's name and/or surname.
    ///
    /// `None` and empty strings leave the stored value untouched. Returns `None`
    /// when no student has this id, in which case nothing is written.
    pub async fn update_student(
        &self,
        id: i64,
        name: Option<&str>,
        surname: Option<&str>,
    ) -> Result<Option<Student>> {
        let name = name.filter(|v| !v.is_empty());
        let surname = surname.filter(|v| !v.is_empty());

        let student: Option<Student> = sqlx::query_as(
            r#"
            UPDATE student
            SET name = COALESCE(?, name), surname = COALESCE(?, surname)
            WHERE id = ?
            RETURNING id, name, surname
            "#,
        )
        .bind(name)
        .bind(surname)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match &student {
            Some(_) => info!("Updated student {}", id),
            None => debug!("Update skipped, no student {}", id),
        }
        Ok(student)
    }

    /// Delete a student. Returns `false` when no student has this id.
    ///
    /// Notes referencing the student are handled according to the store's
    /// [`DeletePolicy`] in the same transaction as the delete itself.
    pub async fn delete_student(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM student WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            debug!("Delete skipped, no student {}", id);
            return Ok(false);
        }

        match self.delete_policy {
            DeletePolicy::Restrict => {
                let notes: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM notes WHERE student_id = ?")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                if notes > 0 {
                    return Err(GradebookError::StillReferenced {
                        student_id: id,
                        notes,
                    });
                }
            }
            DeletePolicy::Nullify => {
                let cleared = sqlx::query("UPDATE notes SET student_id = NULL WHERE student_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                debug!("Cleared student {} from {} note(s)", id, cleared);
            }
            DeletePolicy::Cascade => {
                let removed = sqlx::query("DELETE FROM notes WHERE student_id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
                debug!("Deleted {} note(s) of student {}", removed, id);
            }
        }

        sqlx::query("DELETE FROM student WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(
            "Deleted student {} (policy: {})",
            id,
            self.delete_policy.as_str()
        );
        Ok(true)
    }

    /// Insert several students as one unit: either all rows are stored or none.
    pub async fn add_students_atomically(&self, students: &[NewStudent]) -> Result<Vec<Student>> {
        let mut tx = self.pool.begin().await?;
        let mut added = Vec::with_capacity(students.len());

        for new in students {
            match insert_student(&mut *tx, &new.name, &new.surname).await {
                Ok(student) => added.push(student),
                Err(e) => {
                    warn!("Batch insert failed, rolling back {} row(s): {}", added.len(), e);
                    tx.rollback().await?;
                    return Err(e);
                }
            }
        }

        tx.commit().await?;
        info!("Committed batch of {} student(s)", added.len());
        Ok(added)
    }
}

/// Insert a student on an already acquired connection or transaction
async fn insert_student(conn: &mut SqliteConnection, name: &str, surname: &str) -> Result<Student> {
    let student = sqlx::query_as(
        "INSERT INTO student (name, surname) VALUES (?, ?) RETURNING id, name, surname",
    )
    .bind(name)
    .bind(surname)
    .fetch_one(&mut *conn)
    .await?;

    Ok(student)
}
