//! CRUD behaviour of the record store against a throwaway SQLite file.

use gradebook::database::{NewNote, NewStudent, RecordStore};
use gradebook::{create_session, DatabaseConfig, DeletePolicy, GradebookError};
use tempfile::TempDir;

fn store_config(dir: &TempDir, delete_policy: DeletePolicy) -> DatabaseConfig {
    DatabaseConfig {
        url: format!("sqlite://{}", dir.path().join("gradebook.db").display()),
        max_connections: 2,
        echo: false,
        delete_policy,
    }
}

async fn open_store(dir: &TempDir, delete_policy: DeletePolicy) -> RecordStore {
    create_session(&store_config(dir, delete_policy))
        .await
        .expect("open store")
}

/// Student with one grade record; returns (student id, note id)
async fn student_with_note(store: &RecordStore) -> (i64, i64) {
    let student = store.add_student("Serkan", "YASAR").await.unwrap();
    let city = store.add_city("Istanbul", "Marmara").await.unwrap();
    let lesson = store.add_lesson("Mathematics", 5).await.unwrap();
    let teacher = store.add_teacher("MERT", "YILDIZ").await.unwrap();
    let note = store
        .add_notes(NewNote {
            student_id: student.id,
            lesson_id: lesson.id,
            midterm: 85,
            final_score: 90,
            teacher_id: teacher.id,
            city_id: city.id,
        })
        .await
        .unwrap();
    (student.id, note.id)
}

async fn note_count(store: &RecordStore) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM notes")
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_added_student_can_be_fetched_by_id() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    let added = store.add_student("Ali", "Veli").await.unwrap();
    let fetched = store
        .get_student_by_id(added.id)
        .await
        .unwrap()
        .expect("student exists");

    assert_eq!(fetched.name, "Ali");
    assert_eq!(fetched.surname, "Veli");
    assert_eq!(fetched, added);
}

#[tokio::test]
async fn test_unknown_student_id_is_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    assert!(store.get_student_by_id(42).await.unwrap().is_none());
    assert!(store.update_student(42, Some("X"), None).await.unwrap().is_none());
    assert!(!store.delete_student(42).await.unwrap());
}

#[tokio::test]
async fn test_all_students_come_back_in_insert_order() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    store.add_student("Ali", "Veli").await.unwrap();
    store.add_student("Ayşe", "Fatma").await.unwrap();

    let names: Vec<String> = store
        .get_all_students()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["Ali Veli", "Ayşe Fatma"]);
}

#[tokio::test]
async fn test_update_overwrites_only_supplied_fields() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;
    let student = store.add_student("Ali", "Veli").await.unwrap();

    let updated = store
        .update_student(student.id, None, Some("Demir"))
        .await
        .unwrap()
        .expect("student exists");
    assert_eq!(updated.name, "Ali");
    assert_eq!(updated.surname, "Demir");

    let updated = store
        .update_student(student.id, Some("Veli"), None)
        .await
        .unwrap()
        .expect("student exists");
    assert_eq!(updated.name, "Veli");
    assert_eq!(updated.surname, "Demir");

    // Empty strings count as "not supplied"
    let updated = store
        .update_student(student.id, Some(""), Some(""))
        .await
        .unwrap()
        .expect("student exists");
    assert_eq!(updated.to_string(), "Veli Demir");

    let stored = store.get_student_by_id(student.id).await.unwrap().unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_deleted_student_is_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;
    let student = store.add_student("Ali", "Veli").await.unwrap();

    assert!(store.delete_student(student.id).await.unwrap());
    assert!(store.get_student_by_id(student.id).await.unwrap().is_none());
    assert!(!store.delete_student(student.id).await.unwrap());
}

#[tokio::test]
async fn test_nullify_policy_keeps_notes_without_student() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;
    let (student_id, note_id) = student_with_note(&store).await;

    assert!(store.delete_student(student_id).await.unwrap());

    let remaining: Option<i64> =
        sqlx::query_scalar("SELECT student_id FROM notes WHERE id = ?")
            .bind(note_id)
            .fetch_one(store.pool())
            .await
            .unwrap();
    assert_eq!(remaining, None);
}

#[tokio::test]
async fn test_cascade_policy_removes_notes() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Cascade).await;
    let (student_id, _) = student_with_note(&store).await;

    assert!(store.delete_student(student_id).await.unwrap());
    assert_eq!(note_count(&store).await, 0);
}

#[tokio::test]
async fn test_restrict_policy_refuses_referenced_student() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Restrict).await;
    let (student_id, _) = student_with_note(&store).await;

    let err = store.delete_student(student_id).await.unwrap_err();
    assert!(matches!(
        err,
        GradebookError::StillReferenced { notes: 1, .. }
    ));
    assert!(store.get_student_by_id(student_id).await.unwrap().is_some());
    assert_eq!(note_count(&store).await, 1);

    // Without notes the delete goes through
    let lonely = store.add_student("Ali", "Veli").await.unwrap();
    assert!(store.delete_student(lonely.id).await.unwrap());
}

#[tokio::test]
async fn test_notes_with_dangling_references_are_rejected() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    let result = store
        .add_notes(NewNote {
            student_id: 99,
            lesson_id: 99,
            midterm: 50,
            final_score: 50,
            teacher_id: 99,
            city_id: 99,
        })
        .await;

    assert!(matches!(result, Err(GradebookError::Database(_))));
    assert_eq!(note_count(&store).await, 0);
}

#[tokio::test]
async fn test_out_of_range_values_are_accepted() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    let lesson = store.add_lesson("Chemistry", -3).await.unwrap();
    assert_eq!(lesson.rate, -3);
    assert_eq!(lesson.to_string(), "Chemistry -3");
}

#[tokio::test]
async fn test_overlong_names_are_rejected_by_the_schema() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    let result = store.add_student(&"x".repeat(21), "Veli").await;
    assert!(matches!(result, Err(GradebookError::Database(_))));
    assert!(store.add_student(&"x".repeat(20), "Veli").await.is_ok());
}

#[tokio::test]
async fn test_reopening_keeps_schema_and_rows() {
    let temp = TempDir::new().expect("temp dir");
    let first = open_store(&temp, DeletePolicy::Nullify).await;
    let student = first.add_student("Ali", "Veli").await.unwrap();
    first.close().await;

    let second = open_store(&temp, DeletePolicy::Nullify).await;
    let fetched = second.get_student_by_id(student.id).await.unwrap();
    assert_eq!(fetched, Some(student));
}

#[tokio::test]
async fn test_batch_insert_commits_all_rows() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    let added = store
        .add_students_atomically(&[
            NewStudent::new("Transaction", "Test1"),
            NewStudent::new("Transaction", "Test2"),
        ])
        .await
        .unwrap();

    assert_eq!(added.len(), 2);
    assert_eq!(store.get_all_students().await.unwrap(), added);
}

#[tokio::test]
async fn test_batch_insert_failure_rolls_back_earlier_rows() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    // Second row breaks the 20 character limit on surname
    let result = store
        .add_students_atomically(&[
            NewStudent::new("Transaction", "Test1"),
            NewStudent::new("Transaction", "T".repeat(21)),
        ])
        .await;

    assert!(matches!(result, Err(GradebookError::Database(_))));
    assert!(store.get_all_students().await.unwrap().is_empty());

    // The pool is still usable after the rollback
    store.add_student("Ali", "Veli").await.unwrap();
    assert_eq!(store.get_all_students().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_city_and_teacher_lookup_by_id() {
    let temp = TempDir::new().expect("temp dir");
    let store = open_store(&temp, DeletePolicy::Nullify).await;

    let city = store.add_city("Istanbul", "Marmara").await.unwrap();
    let teacher = store.add_teacher("MERT", "YILDIZ").await.unwrap();

    assert_eq!(store.get_city_by_id(city.id).await.unwrap(), Some(city));
    assert_eq!(store.get_teacher_by_id(teacher.id).await.unwrap(), Some(teacher));
    assert!(store.get_city_by_id(999).await.unwrap().is_none());
    assert!(store.get_teacher_by_id(999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_session_fails_when_database_cannot_be_opened() {
    let config = DatabaseConfig {
        url: "sqlite:///nonexistent_dir/x.db".to_string(),
        max_connections: 1,
        echo: false,
        delete_policy: DeletePolicy::Nullify,
    };

    let result = create_session(&config).await;
    assert!(matches!(result, Err(GradebookError::Database(_))));
}
