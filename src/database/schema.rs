//! Database schema and session factory

use crate::database::operations::RecordStore;
use crate::utils::config::DatabaseConfig;
use crate::utils::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

/// Open the database described by `config`, create any missing tables and
/// return a store bound to the resulting pool.
///
/// Every store operation checks a connection out of the pool for its own
/// duration only, so there is no long-lived shared connection.
pub async fn create_session(config: &DatabaseConfig) -> Result<RecordStore> {
    let pool = initialize_database(config).await?;
    Ok(RecordStore::new(pool, config.delete_policy))
}

/// Connect to the database, creating the file if needed
pub async fn initialize_database(config: &DatabaseConfig) -> Result<Pool<Sqlite>> {
    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);
    if !config.echo {
        options = options.disable_statement_logging();
    }

    debug!("Connecting to database at: {}", config.url);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    info!("Ensuring gradebook schema exists");
    create_tables(&pool).await?;

    Ok(pool)
}

/// Create database tables. Safe to call on an existing schema.
async fn create_tables(pool: &Pool<Sqlite>) -> Result<()> {
    // Create student table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS student (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) <= 20),
            surname TEXT NOT NULL CHECK (length(surname) <= 20)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create city table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS city (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) <= 20),
            region TEXT NOT NULL CHECK (length(region) <= 20)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create lesson table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lesson (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) <= 20),
            rate INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create teacher table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teacher (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) <= 20),
            surname TEXT NOT NULL CHECK (length(surname) <= 20)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create notes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER REFERENCES student(id),
            lesson_id INTEGER REFERENCES lesson(id),
            midterm INTEGER NOT NULL,
            final INTEGER NOT NULL,
            teacher_id INTEGER REFERENCES teacher(id),
            city_id INTEGER REFERENCES city(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_student ON notes(student_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_lesson ON notes(lesson_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_teacher ON notes(teacher_id)")
        .execute(pool)
        .await?;

    debug!("Database tables created successfully");
    Ok(())
}
