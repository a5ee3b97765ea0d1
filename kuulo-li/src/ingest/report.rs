//! Skip-reason accumulation and report assembly
//!
//! Reasons accumulate per file name in a merge-on-insert map and are
//! rendered to the user-facing strings only at the reporting boundary.

use std::collections::{BTreeMap, BTreeSet};

/// Accumulated skip reasons, keyed by file name
#[derive(Debug, Default)]
pub struct ProblemLog {
    reasons: BTreeMap<String, BTreeSet<String>>,
}

impl ProblemLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one reason against one file name, merging with any
    /// reasons already held for it
    pub fn record(&mut self, file_name: &str, reason: impl Into<String>) {
        self.reasons
            .entry(file_name.to_string())
            .or_default()
            .insert(reason.into());
    }

    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Number of distinct file names with at least one reason
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// True when the given file name has at least one recorded reason
    pub fn contains(&self, file_name: &str) -> bool {
        self.reasons.contains_key(file_name)
    }

    /// Render the sorted skipped-file descriptions
    ///
    /// Each entry is `<name> (<reason1>, <reason2>, ...)` with the
    /// reasons in lexicographic order; the returned list is sorted.
    pub fn into_skipped_lines(self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .reasons
            .into_iter()
            .map(|(name, reasons)| {
                let joined = reasons.into_iter().collect::<Vec<_>>().join(", ");
                format!("{} ({})", name, joined)
            })
            .collect();
        lines.sort();
        lines
    }
}
