use regex::Regex;
use std::sync::LazyLock;

use crate::error::ExtractionError;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("Invalid blank line regex"));

// * Normalizes raw extracted text into the canonical form every extractor matches against.
// *
// * Logic:
// * 1. Collapse any whitespace run to a single space.
// * 2. Drop characters outside printable ASCII (line breaks survive until step 3).
// * 3. Normalize \r\n and \r to \n.
// * 4. Collapse runs of blank lines to a single blank line.
// * 5. Trim.
// *
// * Returns EmptyText when nothing readable is left.
pub fn normalize_text(raw: &str) -> Result<String, ExtractionError> {
    // * Step 1: Collapse whitespace
    let collapsed = WHITESPACE_RUN.replace_all(raw, " ");

    // * Step 2: Strip PDF artifacts and other non-ASCII residue
    let ascii: String = collapsed
        .chars()
        .filter(|c| matches!(c, ' '..='~' | '\n' | '\r'))
        .collect();

    // * Step 3: Line breaks
    let unified = ascii.replace("\r\n", "\n").replace('\r', "\n");

    // * Step 4: Blank lines
    let compacted = BLANK_LINE_RUN.replace_all(&unified, "\n\n");

    // * Step 5: Trim
    let text = compacted.trim();
    if text.is_empty() {
        return Err(ExtractionError::EmptyText);
    }

    Ok(text.to_string())
}

/// Truncates to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
