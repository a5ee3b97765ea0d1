//! Database access for lessons and languages

pub mod languages;
pub mod lessons;
