//! SubRip subtitle parsing and transcript derivation
//!
//! Consumes the line-oriented SRT grammar: blocks separated by blank
//! lines, each block holding a numeric sequence line, a
//! `HH:MM:SS,mmm --> HH:MM:SS,mmm` time-range line, and one or more
//! text lines.
//! Parsing is tolerant per block; a malformed block drops that cue
//! without failing the file.

use crate::models::Cue;

/// Parse result: surviving cues plus the flattened transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSubtitle {
    /// Valid cues, ordered by sequence number
    pub cues: Vec<Cue>,
    /// All cue texts joined with a single space, in cue order
    pub transcript: String,
}

impl ParsedSubtitle {
    /// True when no usable text was recovered from the file
    pub fn is_unusable(&self) -> bool {
        self.transcript.trim().is_empty()
    }
}

/// Decode raw bytes as UTF-8 (lossy) and parse
///
/// A mis-encoded subtitle degrades to replacement characters rather
/// than failing the pair.
pub fn parse_subtitle_bytes(raw: &[u8]) -> ParsedSubtitle {
    parse_subtitle(&String::from_utf8_lossy(raw))
}

/// Parse SubRip text into ordered cues and a transcript
pub fn parse_subtitle(raw: &str) -> ParsedSubtitle {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let mut cues: Vec<Cue> = Vec::new();
    for block in blocks(raw) {
        if let Some(cue) = parse_block(&block) {
            cues.push(cue);
        }
    }

    cues.sort_by_key(|cue| cue.sequence);

    let transcript = cues
        .iter()
        .map(|cue| cue.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    ParsedSubtitle { cues, transcript }
}

/// Split into blocks separated by one or more blank lines
fn blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut result = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// Parse one block into a cue, or None if the block is malformed
fn parse_block(lines: &[&str]) -> Option<Cue> {
    let (first, rest) = lines.split_first()?;
    let sequence: u32 = first.trim().parse().ok()?;

    let (time_line, text_lines) = rest.split_first()?;
    if text_lines.is_empty() {
        return None;
    }

    let (start_ms, end_ms) = parse_time_range(time_line)?;
    if start_ms > end_ms {
        return None;
    }

    let text = text_lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ");

    Some(Cue {
        sequence,
        start_ms,
        end_ms,
        text,
    })
}

/// Parse `HH:MM:SS,mmm --> HH:MM:SS,mmm` into millisecond offsets
fn parse_time_range(line: &str) -> Option<(u64, u64)> {
    let (start, end) = line.split_once("-->")?;
    Some((parse_timestamp(start.trim())?, parse_timestamp(end.trim())?))
}

/// Parse one `HH:MM:SS,mmm` timestamp into milliseconds
fn parse_timestamp(value: &str) -> Option<u64> {
    let (clock, millis) = value.split_once(',')?;

    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let millis: u64 = millis.trim().parse().ok()?;

    // Over-range components drop the cue rather than overflow the math
    hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)
}
