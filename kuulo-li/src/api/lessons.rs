//! Lesson endpoints: batch upload, listing, detail

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db;
use crate::ingest::{LessonIngestor, UploadedFile};
use crate::models::{Lesson, LessonSummary};
use crate::storage::MediaStore;
use crate::{ApiError, ApiResult, AppState};

/// Upper bound on one multipart batch body
const MAX_BATCH_BODY_BYTES: usize = 256 * 1024 * 1024;

/// Response for POST /api/v1/lessons/batch
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub message: String,
    pub created_count: usize,
    pub skipped_files: Vec<String>,
}

/// Query parameters for GET /api/v1/lessons
#[derive(Debug, Deserialize)]
pub struct ListLessonsParams {
    pub language_id: Option<i64>,
}

/// POST /api/v1/lessons/batch
///
/// Multipart form: `language_id` (required), `tag` (optional), and any
/// number of `files` parts carrying the audio and subtitle payloads.
pub async fn batch_ingest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<BatchResponse>> {
    let mut language_id: Option<i64> = None;
    let mut tag: Option<String> = None;
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "language_id" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable language_id: {}", e)))?;
                let parsed = value.trim().parse::<i64>().map_err(|_| {
                    ApiError::BadRequest(format!("Invalid language_id: '{}'", value.trim()))
                })?;
                language_id = Some(parsed);
            }
            "tag" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable tag: {}", e)))?;
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    tag = Some(trimmed.to_string());
                }
            }
            "files" => {
                let name = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Unreadable file part '{}': {}", name, e))
                })?;
                files.push(UploadedFile {
                    name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let language_id =
        language_id.ok_or_else(|| ApiError::BadRequest("Missing language_id field".to_string()))?;
    if files.is_empty() {
        return Err(ApiError::BadRequest("No files uploaded".to_string()));
    }
    if !db::languages::language_exists(&state.db, language_id).await? {
        return Err(ApiError::BadRequest(format!(
            "Unknown language_id: {}",
            language_id
        )));
    }

    info!(
        language_id,
        file_count = files.len(),
        tag = tag.as_deref().unwrap_or(""),
        "Received lesson batch"
    );

    let store = MediaStore::new(state.root_folder.clone());
    let ingestor = LessonIngestor::new(state.db.clone(), store);

    let outcome = match ingestor
        .ingest_batch(language_id, tag.as_deref(), &files)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "Batch commit failed");
            *state.last_error.write().await = Some(e.to_string());
            return Err(ApiError::Internal(format!("Batch commit failed: {}", e)));
        }
    };

    let message = format!(
        "Batch complete: {} created, {} skipped",
        outcome.created_count,
        outcome.skipped_files.len()
    );

    Ok(Json(BatchResponse {
        message,
        created_count: outcome.created_count,
        skipped_files: outcome.skipped_files,
    }))
}

/// GET /api/v1/lessons
pub async fn list_lessons(
    State(state): State<AppState>,
    Query(params): Query<ListLessonsParams>,
) -> ApiResult<Json<Vec<LessonSummary>>> {
    let lessons = db::lessons::list_lessons(&state.db, params.language_id).await?;
    Ok(Json(lessons))
}

/// GET /api/v1/lessons/:id
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Lesson>> {
    match db::lessons::load_lesson(&state.db, id).await? {
        Some(lesson) => Ok(Json(lesson)),
        None => Err(ApiError::NotFound(format!("Lesson {} not found", id))),
    }
}

/// Lesson routes
pub fn lesson_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/lessons/batch",
            post(batch_ingest).layer(DefaultBodyLimit::max(MAX_BATCH_BODY_BYTES)),
        )
        .route("/api/v1/lessons", get(list_lessons))
        .route("/api/v1/lessons/:id", get(get_lesson))
}
