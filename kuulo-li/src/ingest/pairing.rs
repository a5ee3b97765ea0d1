//! Pair resolution over classified uploads
//!
//! Pure planning: groups audio and subtitle files by normalized key and
//! produces resolved pairs plus per-file problems. No I/O happens here,
//! so the matching rules are testable without storage or a database.

use std::collections::BTreeMap;

use super::classify::{ClassifiedFile, FileKind};
use super::report::ProblemLog;

const REASON_UNSUPPORTED: &str = "unsupported file type";
const REASON_MISSING_SUBTITLE: &str = "missing matching subtitle file";
const REASON_MISSING_AUDIO: &str = "missing matching audio file";
const REASON_RELATED_AUDIO_AMBIGUOUS: &str = "ambiguous match: related audio group was ambiguous";

/// One unambiguous audio/subtitle pairing
#[derive(Debug, Clone)]
pub struct ResolvedPair {
    pub audio: ClassifiedFile,
    pub subtitle: ClassifiedFile,
    pub normalized_key: String,
}

/// Output of planning: the pairs to ingest plus everything excluded
///
/// Every classified file appears in exactly one of the two parts.
#[derive(Debug)]
pub struct PairingPlan {
    pub pairs: Vec<ResolvedPair>,
    pub problems: ProblemLog,
}

/// Resolve audio/subtitle pairs across a classified batch
///
/// A pair forms only when exactly one audio file and exactly one
/// subtitle file share a normalized key. Any other cardinality voids
/// pairing for that key; ambiguity is never broken by a tie-break.
pub fn resolve_pairs(files: &[ClassifiedFile]) -> PairingPlan {
    let mut problems = ProblemLog::new();
    let mut audio: BTreeMap<&str, Vec<&ClassifiedFile>> = BTreeMap::new();
    let mut subtitles: BTreeMap<&str, Vec<&ClassifiedFile>> = BTreeMap::new();

    for file in files {
        match file.kind {
            FileKind::Audio => audio
                .entry(file.normalized_key.as_str())
                .or_default()
                .push(file),
            FileKind::Subtitle => subtitles
                .entry(file.normalized_key.as_str())
                .or_default()
                .push(file),
            FileKind::Unsupported => {
                let reason = file
                    .parse_error
                    .clone()
                    .unwrap_or_else(|| REASON_UNSUPPORTED.to_string());
                problems.record(&file.original_name, reason);
            }
        }
    }

    let mut pairs = Vec::new();

    for (key, audio_group) in &audio {
        let subtitle_group = subtitles
            .get(key)
            .map(|group| group.as_slice())
            .unwrap_or(&[]);

        if audio_group.len() > 1 {
            let reason = format!(
                "ambiguous match: multiple audio files normalize to '{}'",
                key
            );
            for file in audio_group {
                problems.record(&file.original_name, reason.clone());
            }
            // Subtitles under an ambiguous audio key cannot pair either
            if subtitle_group.len() > 1 {
                let subtitle_reason = format!(
                    "ambiguous match: multiple subtitle files normalize to '{}'",
                    key
                );
                for file in subtitle_group {
                    problems.record(&file.original_name, subtitle_reason.clone());
                }
            } else {
                for file in subtitle_group {
                    problems.record(&file.original_name, REASON_RELATED_AUDIO_AMBIGUOUS);
                }
            }
        } else if subtitle_group.len() > 1 {
            let reason = format!(
                "ambiguous match: multiple subtitle files normalize to '{}'",
                key
            );
            problems.record(&audio_group[0].original_name, reason.clone());
            for file in subtitle_group {
                problems.record(&file.original_name, reason.clone());
            }
        } else if subtitle_group.len() == 1 {
            pairs.push(ResolvedPair {
                audio: audio_group[0].clone(),
                subtitle: subtitle_group[0].clone(),
                normalized_key: (*key).to_string(),
            });
        } else {
            problems.record(&audio_group[0].original_name, REASON_MISSING_SUBTITLE);
        }
    }

    // Subtitle keys with no audio counterpart at all
    for (key, subtitle_group) in &subtitles {
        if !audio.contains_key(key) {
            for file in subtitle_group {
                problems.record(&file.original_name, REASON_MISSING_AUDIO);
            }
        }
    }

    PairingPlan { pairs, problems }
}
