//! Lesson and subtitle cue models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One timestamped subtitle entry
///
/// Offsets are milliseconds from the start of the audio. Invariant:
/// `start_ms <= end_ms` (cues violating it are dropped at parse time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    /// Sequence number from the subtitle file
    pub sequence: u32,
    /// Start offset in milliseconds
    pub start_ms: u64,
    /// End offset in milliseconds
    pub end_ms: u64,
    /// Cue text, multi-line text joined with a single space
    pub text: String,
}

/// A persisted lesson: one audio file plus its parsed subtitle
#[derive(Debug, Clone, Serialize)]
pub struct Lesson {
    /// Lesson GUID (database primary key)
    pub guid: Uuid,
    /// Display title, taken from the audio file's base name
    pub title: String,
    /// Target language this lesson belongs to
    pub language_id: i64,
    /// Optional free-form tag applied to the whole batch
    pub tag: Option<String>,
    /// Flattened text of all cues, used for search and reading view
    pub transcript: String,
    /// Stored audio location, relative to the root folder
    pub media_path: String,
    /// Ordered subtitle cues
    pub cues: Vec<Cue>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    /// Create a new lesson record with a fresh GUID
    pub fn new(
        title: String,
        language_id: i64,
        tag: Option<String>,
        transcript: String,
        media_path: String,
        cues: Vec<Cue>,
    ) -> Self {
        Self {
            guid: Uuid::new_v4(),
            title,
            language_id,
            tag,
            transcript,
            media_path,
            cues,
            created_at: Utc::now(),
        }
    }
}

/// Listing row for the lesson library (no transcript or cues)
#[derive(Debug, Clone, Serialize)]
pub struct LessonSummary {
    pub guid: Uuid,
    pub title: String,
    pub language_id: i64,
    pub tag: Option<String>,
    pub media_path: String,
    pub created_at: DateTime<Utc>,
}
