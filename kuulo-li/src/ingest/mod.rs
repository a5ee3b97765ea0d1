//! Batch pairing and ingestion engine
//!
//! Pipeline: classify uploads by file name, resolve audio/subtitle pairs
//! by normalized key (pure planning, no I/O), then execute the plan
//! against storage and the database. Every input file ends up either in
//! a created lesson or in the skipped report, never both and never
//! neither.

pub mod classify;
pub mod ingestor;
pub mod pairing;
pub mod report;
pub mod subtitle;

pub use classify::{classify, normalize_key, ClassifiedFile, FileKind};
pub use ingestor::{BatchOutcome, LessonIngestor, UploadedFile};
pub use pairing::{resolve_pairs, PairingPlan, ResolvedPair};
pub use report::ProblemLog;
pub use subtitle::{parse_subtitle, parse_subtitle_bytes, ParsedSubtitle};
