//! Data models for kuulo-li

pub mod lesson;

pub use lesson::{Cue, Lesson, LessonSummary};
