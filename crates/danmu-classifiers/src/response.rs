//! Line-oriented reply parsing for remote providers
//!
//! Providers are asked to answer with one `comment -> value` line per
//! comment. Lines that do not match are dropped; a partial parse is fine.

use danmu_core::{Classification, DisplayLanguage, SentimentClass};
use std::collections::HashSet;

/// Separator between the echoed comment and the value
pub const SEPARATOR: &str = "->";

/// Split a reply into `(comment, value)` pairs.
///
/// A line must contain the separator exactly once; both sides are trimmed.
/// An empty side is kept as an empty string.
pub fn parse_labelled_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split(SEPARATOR);
            let comment = parts.next()?.trim();
            let value = parts.next()?.trim();
            if parts.next().is_some() {
                return None;
            }
            Some((comment.to_string(), value.to_string()))
        })
        .collect()
}

/// Map a label to a sentiment class by case-insensitive containment of the
/// localized Positive, then Negative label. Anything else is Neutral.
pub fn label_to_class(label: &str, language: DisplayLanguage) -> SentimentClass {
    let label = label.to_lowercase();
    let positive = language.label(SentimentClass::Positive).to_lowercase();
    let negative = language.label(SentimentClass::Negative).to_lowercase();

    if label.contains(&positive) {
        SentimentClass::Positive
    } else if label.contains(&negative) {
        SentimentClass::Negative
    } else {
        SentimentClass::Neutral
    }
}

/// Parse a classification reply into buckets.
///
/// A comment echoed more than once keeps its first label, so every comment
/// lands in exactly one bucket.
pub fn parse_classification(text: &str, language: DisplayLanguage) -> Classification {
    let mut classification = Classification::new();
    let mut seen = HashSet::new();
    for (comment, label) in parse_labelled_lines(text) {
        if !seen.insert(comment.clone()) {
            continue;
        }
        classification.push(label_to_class(&label, language), comment);
    }
    classification
}
