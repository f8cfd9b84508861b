//! Database initialization
//!
//! Creates the database file on first run and applies the schema
//! idempotently (`CREATE TABLE IF NOT EXISTS`), so it is safe to call on
//! every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Foreign keys are a per-connection setting, so they go on the connect
    // options rather than a one-off PRAGMA.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_tables(&pool).await?;

    Ok(pool)
}

/// Initialize a private in-memory database (tests and local experiments)
///
/// The pool is pinned to a single connection that never expires: every
/// SQLite `:memory:` connection is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_tables(&pool).await?;

    Ok(pool)
}

/// Create all training tables and their indexes
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    create_syllabus_table(pool).await?;
    create_cls_table(pool).await?;
    create_student_table(pool).await?;
    Ok(())
}

async fn create_syllabus_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS syllabus (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            created TIMESTAMP NOT NULL,
            updated TIMESTAMP NOT NULL,
            deleted TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS syllabus_deleted ON syllabus(deleted)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS syllabus_name ON syllabus(name)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS syllabus_member_id ON syllabus(member_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_cls_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cls (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_date DATE NOT NULL,
            finish_date DATE,
            trainer TEXT NOT NULL,
            syllabus_id INTEGER NOT NULL REFERENCES syllabus(id) ON DELETE CASCADE,
            created TIMESTAMP NOT NULL,
            updated TIMESTAMP NOT NULL,
            deleted TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS cls_deleted ON cls(deleted)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS cls_finish_date ON cls(finish_date)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS cls_start_date ON cls(start_date)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS cls_trainer ON cls(trainer)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS cls_syllabus_id ON cls(syllabus_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_student_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS student (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cls_id INTEGER NOT NULL REFERENCES cls(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            created TIMESTAMP NOT NULL,
            updated TIMESTAMP NOT NULL,
            deleted TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS student_deleted ON student(deleted)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS student_notes ON student(notes)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS student_user_id ON student(user_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS student_cls_id ON student(cls_id)")
        .execute(pool)
        .await?;

    Ok(())
}
