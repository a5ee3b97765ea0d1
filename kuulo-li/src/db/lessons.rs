//! Lesson persistence
//!
//! Batch inserts run inside a single transaction so a whole upload
//! lands or nothing does. Cues are stored as a JSON array in a TEXT
//! column.

use chrono::{DateTime, Utc};
use kuulo_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::models::{Cue, Lesson, LessonSummary};

/// Insert a batch of lessons atomically
pub async fn insert_lessons(pool: &SqlitePool, lessons: &[Lesson]) -> Result<()> {
    if lessons.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for lesson in lessons {
        let cues_json = serde_json::to_string(&lesson.cues)
            .map_err(|e| Error::Internal(format!("Failed to serialize cues: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO lessons (guid, title, language_id, tag, transcript, media_path, cues, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(lesson.guid.to_string())
        .bind(&lesson.title)
        .bind(lesson.language_id)
        .bind(lesson.tag.as_deref())
        .bind(&lesson.transcript)
        .bind(&lesson.media_path)
        .bind(cues_json)
        .bind(lesson.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    debug!(count = lessons.len(), "Inserted lesson batch");

    Ok(())
}

/// List lesson summaries, optionally filtered by language
pub async fn list_lessons(
    pool: &SqlitePool,
    language_id: Option<i64>,
) -> Result<Vec<LessonSummary>> {
    let rows = match language_id {
        Some(id) => {
            sqlx::query(
                r#"
                SELECT guid, title, language_id, tag, media_path, created_at
                FROM lessons
                WHERE language_id = ?
                ORDER BY created_at DESC, title
                "#,
            )
            .bind(id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT guid, title, language_id, tag, media_path, created_at
                FROM lessons
                ORDER BY created_at DESC, title
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(summary_from_row).collect()
}

/// Load one full lesson by guid, including transcript and cues
pub async fn load_lesson(pool: &SqlitePool, guid: Uuid) -> Result<Option<Lesson>> {
    let row = sqlx::query(
        r#"
        SELECT guid, title, language_id, tag, transcript, media_path, cues, created_at
        FROM lessons
        WHERE guid = ?
        "#,
    )
    .bind(guid.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(lesson_from_row(&row)?)),
        None => Ok(None),
    }
}

fn summary_from_row(row: &SqliteRow) -> Result<LessonSummary> {
    Ok(LessonSummary {
        guid: parse_guid(row)?,
        title: row.get("title"),
        language_id: row.get("language_id"),
        tag: row.get("tag"),
        media_path: row.get("media_path"),
        created_at: parse_created_at(row)?,
    })
}

fn lesson_from_row(row: &SqliteRow) -> Result<Lesson> {
    let cues_json: String = row.get("cues");
    let cues: Vec<Cue> = serde_json::from_str(&cues_json)
        .map_err(|e| Error::Internal(format!("Failed to parse stored cues: {}", e)))?;

    Ok(Lesson {
        guid: parse_guid(row)?,
        title: row.get("title"),
        language_id: row.get("language_id"),
        tag: row.get("tag"),
        transcript: row.get("transcript"),
        media_path: row.get("media_path"),
        cues,
        created_at: parse_created_at(row)?,
    })
}

fn parse_guid(row: &SqliteRow) -> Result<Uuid> {
    let guid_str: String = row.get("guid");
    Uuid::parse_str(&guid_str)
        .map_err(|e| Error::Internal(format!("Invalid lesson guid '{}': {}", guid_str, e)))
}

fn parse_created_at(row: &SqliteRow) -> Result<DateTime<Utc>> {
    let created_str: String = row.get("created_at");
    Ok(DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| Error::Internal(format!("Invalid created_at '{}': {}", created_str, e)))?
        .with_timezone(&Utc))
}
