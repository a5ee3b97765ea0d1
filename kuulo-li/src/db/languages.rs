//! Language catalog queries

use kuulo_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// A supported lesson language
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Language {
    pub id: i64,
    pub code: String,
    pub name: String,
}

/// List all languages ordered by id
pub async fn list_languages(pool: &SqlitePool) -> Result<Vec<Language>> {
    let languages = sqlx::query_as::<_, Language>(
        r#"
        SELECT id, code, name FROM languages ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(languages)
}

/// Check whether a language id exists
pub async fn language_exists(pool: &SqlitePool, language_id: i64) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(SELECT 1 FROM languages WHERE id = ?)
        "#,
    )
    .bind(language_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}
