//! Reporting queries over grade records

use crate::database::models::{LessonAverage, Note, Student, StudentNotes};
use crate::database::operations::RecordStore;
use crate::utils::error::Result;
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::BTreeSet;
use tracing::{debug, warn};

impl RecordStore {
    /// Load a student and all of their notes in a single query.
    ///
    /// Returns `None` when the student does not exist; a student without notes
    /// yields an empty `notes` list.
    pub async fn get_student_notes(&self, student_id: i64) -> Result<Option<StudentNotes>> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.name, s.surname,
                   n.id AS note_id, n.lesson_id, n.midterm, n.final, n.teacher_id, n.city_id
            FROM student s
            LEFT JOIN notes n ON n.student_id = s.id
            WHERE s.id = ?
            ORDER BY n.id
            "#,
        )
        .bind(student_id)
        .fetch_all(self.pool())
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };
        let student = Student {
            id: first.try_get("id")?,
            name: first.try_get("name")?,
            surname: first.try_get("surname")?,
        };

        let mut notes = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(note_id) = row.try_get::<Option<i64>, _>("note_id")? else {
                continue;
            };
            notes.push(Note {
                id: note_id,
                student_id: Some(student.id),
                lesson_id: row.try_get("lesson_id")?,
                midterm: row.try_get("midterm")?,
                final_score: row.try_get("final")?,
                teacher_id: row.try_get("teacher_id")?,
                city_id: row.try_get("city_id")?,
            });
        }

        debug!("Loaded {} note(s) for student {}", notes.len(), student_id);
        Ok(Some(StudentNotes { student, notes }))
    }

    /// Students a teacher has graded, each listed once.
    ///
    /// A teacher with no notes (or an unknown teacher id) gives an empty list.
    pub async fn get_teacher_students(&self, teacher_id: i64) -> Result<Vec<Student>> {
        let student_ids: BTreeSet<i64> =
            sqlx::query_scalar::<_, Option<i64>>("SELECT student_id FROM notes WHERE teacher_id = ?")
                .bind(teacher_id)
                .fetch_all(self.pool())
                .await?
                .into_iter()
                .flatten()
                .collect();

        if student_ids.is_empty() {
            debug!("Teacher {} has no graded students", teacher_id);
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, name, surname FROM student WHERE id IN (");
        let mut ids = query.separated(", ");
        for id in &student_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY id");

        let students = query
            .build_query_as::<Student>()
            .fetch_all(self.pool())
            .await?;

        Ok(students)
    }

    /// Mean midterm and final score per lesson.
    ///
    /// Averaging is done by the database; each lesson row is then looked up on
    /// its own. Groups without a resolvable lesson are skipped.
    pub async fn get_average_scores(&self) -> Result<Vec<LessonAverage>> {
        let groups = sqlx::query(
            r#"
            SELECT lesson_id, AVG(midterm) AS avg_midterm, AVG(final) AS avg_final
            FROM notes
            GROUP BY lesson_id
            ORDER BY lesson_id
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        let mut averages = Vec::with_capacity(groups.len());
        for row in groups {
            let Some(lesson_id) = row.try_get::<Option<i64>, _>("lesson_id")? else {
                warn!("Skipping notes without a lesson");
                continue;
            };
            let avg_midterm: f64 = row.try_get("avg_midterm")?;
            let avg_final: f64 = row.try_get("avg_final")?;

            match self.get_lesson_by_id(lesson_id).await? {
                Some(lesson) => averages.push(LessonAverage {
                    lesson,
                    avg_midterm,
                    avg_final,
                }),
                None => warn!("Skipping averages for missing lesson {}", lesson_id),
            }
        }

        Ok(averages)
    }
}
