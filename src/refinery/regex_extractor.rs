// * Shared pattern-matching primitives for the section extractors.
// * Every extractor is a pure function over normalized text built on these helpers.

use regex::Regex;

use crate::error::ExtractionError;

/// Compiles a static pattern table, panicking on an invalid literal
pub fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).unwrap_or_else(|e| panic!("Invalid pattern {:?}: {}", p, e)))
        .collect()
}

/// Parses a matched numeral, stripping thousands separators
///
/// A failure here is a per-match skip, never an extractor failure.
pub fn parse_amount(raw: &str) -> Result<f64, ExtractionError> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExtractionError::MalformedNumericLiteral(raw.to_string()))
}

/// Returns the text within `radius` chars on each side of `[start, end)`, trimmed
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let mut lo = start.saturating_sub(radius);
    while !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + radius).min(text.len());
    while !text.is_char_boundary(hi) {
        hi += 1;
    }
    text[lo..hi].trim()
}

/// Group 1 of the first pattern (in table order) that matches, trimmed
pub fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

/// Whole match of the first pattern (in table order) that matches
pub fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.find(text).map(|m| m.as_str().trim().to_string()))
}

/// Group 1 of every match of every pattern, table order then document order
pub fn all_captures<'t>(patterns: &'t [Regex], text: &'t str) -> impl Iterator<Item = &'t str> + 't {
    patterns.iter().flat_map(move |re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim()))
    })
}

/// Appends `item` unless it is empty or already present
pub fn push_unique(items: &mut Vec<String>, item: &str) {
    if !item.is_empty() && !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}

/// True if any pattern matches
pub fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}
