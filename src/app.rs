//! Console front end: runs gradebook operations and prints one line per result

use crate::database::{NewNote, NewStudent, RecordStore};
use anyhow::Result;
use clap::Subcommand;
use tracing::info;

/// Operation to run against the gradebook
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Replay the built-in demonstration sequence
    Demo,
    AddStudent { name: String, surname: String },
    AddCity { name: String, region: String },
    AddLesson {
        name: String,
        #[arg(allow_negative_numbers = true)]
        rate: i64,
    },
    AddTeacher { name: String, surname: String },
    AddNotes {
        student_id: i64,
        lesson_id: i64,
        #[arg(allow_negative_numbers = true)]
        midterm: i64,
        #[arg(allow_negative_numbers = true)]
        final_score: i64,
        teacher_id: i64,
        city_id: i64,
    },
    /// List every student
    Students,
    /// Show one student
    Student { id: i64 },
    /// Show one city
    City { id: i64 },
    /// Show one teacher
    Teacher { id: i64 },
    UpdateStudent {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
    },
    DeleteStudent { id: i64 },
    /// List a student's grade records
    StudentNotes { id: i64 },
    /// List the students a teacher has graded
    TeacherStudents { id: i64 },
    /// Mean midterm and final score per lesson
    Averages,
    /// Insert two students in one transaction
    TransactionExample,
}

/// Printing wrapper around a [`RecordStore`]
pub struct App {
    store: RecordStore,
}

impl App {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Run a single command
    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Demo => self.run_demo().await?,
            Command::AddStudent { name, surname } => {
                self.add_student(&name, &surname).await?;
            }
            Command::AddCity { name, region } => {
                self.add_city(&name, &region).await?;
            }
            Command::AddLesson { name, rate } => {
                self.add_lesson(&name, rate).await?;
            }
            Command::AddTeacher { name, surname } => {
                self.add_teacher(&name, &surname).await?;
            }
            Command::AddNotes {
                student_id,
                lesson_id,
                midterm,
                final_score,
                teacher_id,
                city_id,
            } => {
                self.add_notes(NewNote {
                    student_id,
                    lesson_id,
                    midterm,
                    final_score,
                    teacher_id,
                    city_id,
                })
                .await?;
            }
            Command::Students => self.get_all_students().await?,
            Command::Student { id } => self.get_student_by_id(id).await?,
            Command::City { id } => self.get_city_by_id(id).await?,
            Command::Teacher { id } => self.get_teacher_by_id(id).await?,
            Command::UpdateStudent { id, name, surname } => {
                self.update_student(id, name.as_deref(), surname.as_deref())
                    .await?
            }
            Command::DeleteStudent { id } => self.delete_student(id).await?,
            Command::StudentNotes { id } => self.get_student_notes(id).await?,
            Command::TeacherStudents { id } => self.get_teacher_students(id).await?,
            Command::Averages => self.get_average_scores().await?,
            Command::TransactionExample => self.transaction_example().await,
        }
        Ok(())
    }

    /// Fixed demonstration sequence. Ids returned by the add operations are fed
    /// into the later calls instead of assuming a fresh database.
    pub async fn run_demo(&self) -> Result<()> {
        info!("Running demo sequence");

        let serkan = self.add_student("Serkan", "YASAR").await?;
        let istanbul = self.add_city("Istanbul", "Marmara").await?;
        let maths = self.add_lesson("Mathematics", 5).await?;
        let mert = self.add_teacher("MERT", "YILDIZ").await?;
        self.add_notes(NewNote {
            student_id: serkan,
            lesson_id: maths,
            midterm: 85,
            final_score: 90,
            teacher_id: mert,
            city_id: istanbul,
        })
        .await?;
        self.get_all_students().await?;
        self.get_student_by_id(serkan).await?;
        self.update_student(serkan, Some("Serkan"), None).await?;
        self.delete_student(serkan).await?;

        let ali = self.add_student("Ali", "Veli").await?;
        let ayse = self.add_student("Ayşe", "Fatma").await?;
        let ahmet = self.add_teacher("Ahmet", "Mehmet").await?;
        let physics = self.add_lesson("FIZIK", 4).await?;
        for (student_id, midterm, final_score) in [(ali, 78, 88), (ayse, 65, 75)] {
            self.add_notes(NewNote {
                student_id,
                lesson_id: physics,
                midterm,
                final_score,
                teacher_id: ahmet,
                city_id: istanbul,
            })
            .await?;
        }
        self.get_student_notes(ali).await?;
        self.get_teacher_students(ahmet).await?;
        self.get_average_scores().await?;
        self.transaction_example().await;

        Ok(())
    }

    pub async fn add_student(&self, name: &str, surname: &str) -> Result<i64> {
        let student = self.store.add_student(name, surname).await?;
        println!("Added student: {}", student);
        Ok(student.id)
    }

    pub async fn add_city(&self, name: &str, region: &str) -> Result<i64> {
        let city = self.store.add_city(name, region).await?;
        println!("Added city: {}", city);
        Ok(city.id)
    }

    pub async fn add_lesson(&self, name: &str, rate: i64) -> Result<i64> {
        let lesson = self.store.add_lesson(name, rate).await?;
        println!("Added lesson: {}", lesson);
        Ok(lesson.id)
    }

    pub async fn add_teacher(&self, name: &str, surname: &str) -> Result<i64> {
        let teacher = self.store.add_teacher(name, surname).await?;
        println!("Added teacher: {}", teacher);
        Ok(teacher.id)
    }

    pub async fn add_notes(&self, note: NewNote) -> Result<i64> {
        let note = self.store.add_notes(note).await?;
        println!("Added notes: {}", note);
        Ok(note.id)
    }

    pub async fn get_all_students(&self) -> Result<()> {
        for student in self.store.get_all_students().await? {
            println!("{}", student);
        }
        Ok(())
    }

    pub async fn get_student_by_id(&self, id: i64) -> Result<()> {
        match self.store.get_student_by_id(id).await? {
            Some(student) => println!("{}", student),
            None => print_not_found(id),
        }
        Ok(())
    }

    pub async fn get_city_by_id(&self, id: i64) -> Result<()> {
        match self.store.get_city_by_id(id).await? {
            Some(city) => println!("{}", city),
            None => println!("No city found with ID: {}", id),
        }
        Ok(())
    }

    pub async fn get_teacher_by_id(&self, id: i64) -> Result<()> {
        match self.store.get_teacher_by_id(id).await? {
            Some(teacher) => println!("{}", teacher),
            None => println!("No teacher found with ID: {}", id),
        }
        Ok(())
    }

    pub async fn update_student(
        &self,
        id: i64,
        name: Option<&str>,
        surname: Option<&str>,
    ) -> Result<()> {
        match self.store.update_student(id, name, surname).await? {
            Some(student) => println!("Updated student: {}", student),
            None => print_not_found(id),
        }
        Ok(())
    }

    pub async fn delete_student(&self, id: i64) -> Result<()> {
        if self.store.delete_student(id).await? {
            println!("Deleted student with ID: {}", id);
        } else {
            print_not_found(id);
        }
        Ok(())
    }

    pub async fn get_student_notes(&self, id: i64) -> Result<()> {
        match self.store.get_student_notes(id).await? {
            Some(found) => {
                for note in found.notes {
                    println!("{}", note);
                }
            }
            None => print_not_found(id),
        }
        Ok(())
    }

    pub async fn get_teacher_students(&self, teacher_id: i64) -> Result<()> {
        for student in self.store.get_teacher_students(teacher_id).await? {
            println!("{}", student);
        }
        Ok(())
    }

    pub async fn get_average_scores(&self) -> Result<()> {
        for avg in self.store.get_average_scores().await? {
            println!(
                "Lesson: {}, Avg Midterm: {}, Avg Final: {}",
                avg.lesson.name, avg.avg_midterm, avg.avg_final
            );
        }
        Ok(())
    }

    /// Insert two students atomically. Failures are reported, not propagated.
    pub async fn transaction_example(&self) {
        let batch = [
            NewStudent::new("Transaction", "Test1"),
            NewStudent::new("Transaction", "Test2"),
        ];
        match self.store.add_students_atomically(&batch).await {
            Ok(_) => println!("Transaction successful"),
            Err(e) => println!("Transaction failed: {}", e),
        }
    }
}

fn print_not_found(id: i64) {
    println!("No student found with ID: {}", id);
}
