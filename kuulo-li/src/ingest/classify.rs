//! File classification and name normalization
//!
//! Classification is a pure string operation over the upload's file
//! name; no file content is inspected here.

pub(crate) const AUDIO_EXTENSION: &str = "mp3";
const SUBTITLE_EXTENSION: &str = "srt";

/// Role a file plays in pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Audio,
    Subtitle,
    Unsupported,
}

/// Per-file classification, derived once per upload and immutable after
#[derive(Debug, Clone)]
pub struct ClassifiedFile {
    /// Position of the payload within the batch
    pub index: usize,
    /// File name exactly as uploaded
    pub original_name: String,
    /// File name with its final extension removed
    pub base_name: String,
    /// Matching key derived from the base name
    pub normalized_key: String,
    pub kind: FileKind,
    /// Set when the name could not be decomposed into name + extension
    pub parse_error: Option<String>,
}

/// Canonical matching key for a base name
///
/// Lowercased with every whitespace, underscore, and hyphen character
/// removed. Applied to the whole base name; trailing language-code
/// suffixes get no special treatment. This is the single source of
/// truth for matching audio against subtitle names.
pub fn normalize_key(base_name: &str) -> String {
    base_name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect()
}

/// Classify one uploaded file by its name
pub fn classify(index: usize, original_name: &str) -> ClassifiedFile {
    match split_name(original_name) {
        Some((base, extension)) => {
            let kind = if extension.eq_ignore_ascii_case(AUDIO_EXTENSION) {
                FileKind::Audio
            } else if extension.eq_ignore_ascii_case(SUBTITLE_EXTENSION) {
                FileKind::Subtitle
            } else {
                FileKind::Unsupported
            };

            ClassifiedFile {
                index,
                original_name: original_name.to_string(),
                base_name: base.to_string(),
                normalized_key: normalize_key(base),
                kind,
                parse_error: None,
            }
        }
        None => ClassifiedFile {
            index,
            original_name: original_name.to_string(),
            // No usable decomposition, the raw name stands in for the base
            base_name: original_name.to_string(),
            normalized_key: normalize_key(original_name),
            kind: FileKind::Unsupported,
            parse_error: Some(format!("cannot parse file name '{}'", original_name)),
        },
    }
}

/// Split a file name into (base, extension) on the final dot
///
/// Returns None when there is no usable decomposition: empty name, no
/// dot, or an empty base or extension.
fn split_name(name: &str) -> Option<(&str, &str)> {
    let (base, extension) = name.rsplit_once('.')?;
    if base.is_empty() || extension.is_empty() {
        return None;
    }
    Some((base, extension))
}
