//! Batch ingestion orchestration
//!
//! Drives one upload batch end to end: classify names, resolve pairs,
//! store media and parse subtitles per pair, then commit all staged
//! lessons in a single transaction. A failing pair skips that pair
//! only; a failing commit fails the whole batch.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db;
use crate::ingest::classify::{classify, ClassifiedFile};
use crate::ingest::pairing::{resolve_pairs, ResolvedPair};
use crate::ingest::subtitle::parse_subtitle_bytes;
use crate::models::Lesson;
use crate::storage::MediaStore;

/// One file received in an upload batch
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Result of a committed batch
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Lessons written to the database
    pub created_count: usize,
    /// Skipped entries as `"<name> (<reason>, ...)"` lines, sorted
    pub skipped_files: Vec<String>,
}

/// Runs upload batches against the database and media store
pub struct LessonIngestor {
    db: SqlitePool,
    store: MediaStore,
}

impl LessonIngestor {
    pub fn new(db: SqlitePool, store: MediaStore) -> Self {
        Self { db, store }
    }

    /// Ingest one upload batch for a language
    ///
    /// Returns Err only when the final database commit fails; by then
    /// no lesson rows exist (the transaction rolled back), though
    /// media files written for staged pairs remain on disk.
    pub async fn ingest_batch(
        &self,
        language_id: i64,
        tag: Option<&str>,
        files: &[UploadedFile],
    ) -> kuulo_common::Result<BatchOutcome> {
        let classified: Vec<ClassifiedFile> = files
            .iter()
            .enumerate()
            .map(|(index, file)| classify(index, &file.name))
            .collect();

        let plan = resolve_pairs(&classified);
        let mut problems = plan.problems;

        info!(
            file_count = files.len(),
            pair_count = plan.pairs.len(),
            problem_count = problems.len(),
            "Batch plan resolved"
        );

        let mut staged: Vec<Lesson> = Vec::new();
        for pair in &plan.pairs {
            match self.ingest_pair(language_id, tag, pair, files).await {
                Ok(lesson) => {
                    debug!(guid = %lesson.guid, title = %lesson.title, "Staged lesson");
                    staged.push(lesson);
                }
                Err(reason) => {
                    warn!(
                        audio = %pair.audio.original_name,
                        subtitle = %pair.subtitle.original_name,
                        %reason,
                        "Skipping pair"
                    );
                    let pair_name = format!(
                        "{} / {}",
                        pair.audio.original_name, pair.subtitle.original_name
                    );
                    problems.record(&pair_name, reason);
                }
            }
        }

        db::lessons::insert_lessons(&self.db, &staged).await?;

        let created_count = staged.len();
        let skipped_files = problems.into_skipped_lines();

        info!(
            created = created_count,
            skipped = skipped_files.len(),
            "Batch complete"
        );

        Ok(BatchOutcome {
            created_count,
            skipped_files,
        })
    }

    /// Process one resolved pair into a lesson ready for insert
    ///
    /// The Err value is the user-facing skip reason. Media written for
    /// a pair that later fails is removed again.
    async fn ingest_pair(
        &self,
        language_id: i64,
        tag: Option<&str>,
        pair: &ResolvedPair,
        files: &[UploadedFile],
    ) -> Result<Lesson, String> {
        let audio_bytes = &files[pair.audio.index].bytes;
        let subtitle_bytes = &files[pair.subtitle.index].bytes;

        let media_path = self
            .store
            .save_audio(language_id, audio_bytes)
            .await
            .map_err(|e| format!("failed to store audio: {}", e))?;

        let parsed = parse_subtitle_bytes(subtitle_bytes);
        if parsed.is_unusable() {
            self.discard_media(&media_path).await;
            return Err("transcript parsing failed".to_string());
        }

        Ok(Lesson::new(
            pair.audio.base_name.clone(),
            language_id,
            tag.map(|t| t.to_string()),
            parsed.transcript,
            media_path,
            parsed.cues,
        ))
    }

    /// Best-effort removal of media belonging to a skipped pair
    async fn discard_media(&self, media_path: &str) {
        if let Err(e) = self.store.remove(media_path).await {
            warn!(path = %media_path, error = %e, "Failed to remove media for skipped pair");
        }
    }
}
