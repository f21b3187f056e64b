use once_cell::sync::Lazy;
use regex::Regex;

/// The corpus's canonical identifier scheme on released filenames.
static CANONICAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)house[_-]?oversight[_-]?(\d+)").unwrap());

/// Fallback: any run of four or more digits.
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4,}").unwrap());

/// Extract structured reference IDs from a source filename.
///
/// The canonical pattern is tried first; only when it finds nothing does
/// the generic digit-run fallback apply.
pub fn extract_reference_ids(value: &str) -> Vec<String> {
    let canonical: Vec<String> = CANONICAL_ID
        .captures_iter(value)
        .map(|cap| cap[1].to_string())
        .collect();
    if !canonical.is_empty() {
        return canonical;
    }
    DIGIT_RUN
        .find_iter(value)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Deduplicate preserving first-seen order.
pub fn dedup_ordered(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut ordered = Vec::with_capacity(values.len());
    for value in values {
        if seen.insert(value.clone()) {
            ordered.push(value);
        }
    }
    ordered
}
