//! Database initialization
//!
//! Creates the SQLite database on first run and applies the idempotent
//! schema. Safe to call on every startup.

use crate::Result;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Current schema version, recorded in the schema_version table
const SCHEMA_VERSION: i64 = 1;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use sqlite options to create database if it doesn't exist
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    apply_schema(&pool).await?;

    Ok(pool)
}

/// Apply pragmas and the idempotent schema to an open pool
///
/// Split out from [`init_database`] so tests can run against an
/// in-memory database.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    // WAL allows concurrent readers while a batch commit is writing
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;

    // Migrations (idempotent - safe to call multiple times)
    create_schema_version_table(pool).await?;
    create_languages_table(pool).await?;
    create_lessons_table(pool).await?;

    record_schema_version(pool).await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn record_schema_version(pool: &SqlitePool) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the languages table
///
/// Stores the fixed set of target languages lessons can belong to.
pub async fn create_languages_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS languages (
            id INTEGER PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Seed the supported languages
    let defaults = vec![
        (1, "fi", "Finnish"),
        (2, "de", "German"),
        (3, "es", "Spanish"),
        (4, "fr", "French"),
        (5, "ja", "Japanese"),
    ];

    for (id, code, name) in defaults {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO languages (id, code, name)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .execute(pool)
        .await?;
    }

    Ok(())
}

/// Create the lessons table
///
/// One row per ingested lesson. The audio lives on disk under the media
/// tree; `media_path` is relative to the root folder. Subtitle cues are
/// stored denormalized as a JSON array.
pub async fn create_lessons_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lessons (
            guid TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            language_id INTEGER NOT NULL REFERENCES languages(id),
            tag TEXT,
            transcript TEXT NOT NULL,
            media_path TEXT NOT NULL,
            cues TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            CHECK (length(title) > 0),
            CHECK (length(transcript) > 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_lessons_language ON lessons(language_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_lessons_title ON lessons(title)")
        .execute(pool)
        .await?;

    Ok(())
}
