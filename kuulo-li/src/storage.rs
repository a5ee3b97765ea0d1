//! Media file storage under the root folder
//!
//! Audio payloads are written below `<root>/media/<language_id>/` with
//! generated file names. Only the relative path is recorded in the
//! database so the root folder can move between hosts.

use std::path::PathBuf;

use kuulo_common::Result;
use tracing::debug;
use uuid::Uuid;

use crate::ingest::classify::AUDIO_EXTENSION;

/// Writes and removes lesson media beneath the root folder
#[derive(Debug, Clone)]
pub struct MediaStore {
    root_folder: PathBuf,
}

impl MediaStore {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Write audio bytes to a freshly named file for the language
    ///
    /// Returns the path relative to the root folder, e.g.
    /// `media/1/550e8400-....mp3`.
    pub async fn save_audio(&self, language_id: i64, bytes: &[u8]) -> Result<String> {
        let file_name = format!("{}.{}", Uuid::new_v4(), AUDIO_EXTENSION);
        let relative_path = format!("media/{}/{}", language_id, file_name);
        let absolute_path = self.root_folder.join(&relative_path);

        if let Some(parent) = absolute_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&absolute_path, bytes).await?;

        debug!(
            path = %relative_path,
            size_bytes = bytes.len(),
            "Saved media file"
        );

        Ok(relative_path)
    }

    /// Delete a previously saved media file by its relative path
    pub async fn remove(&self, media_path: &str) -> Result<()> {
        let absolute_path = self.root_folder.join(media_path);
        tokio::fs::remove_file(&absolute_path).await?;

        debug!(path = %media_path, "Removed media file");

        Ok(())
    }
}
