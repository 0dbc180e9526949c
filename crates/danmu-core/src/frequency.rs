//! Comment frequency aggregation
//!
//! Collapses the raw comment stream into unique texts with occurrence
//! counts. Remote classification is billed per unique item, so only the
//! unique list is ever sent out; the counts restore exact statistics later.

use serde::Serialize;
use std::collections::HashMap;

/// Unique comment text → occurrence count, in first-occurrence order.
///
/// Invariant: the sum of all counts equals [`FrequencyTable::total`], and
/// every key is distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<(String, usize)>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    total: usize,
}

impl FrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate raw comments, dropping entries that are empty after trimming
    pub fn aggregate<I, S>(comments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for comment in comments {
            table.record(comment.as_ref());
        }
        table
    }

    /// Build a table from explicit counts. Zero counts are skipped and
    /// repeated keys are merged.
    pub fn from_counts<I, S>(counts: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for (text, count) in counts {
            if count == 0 {
                continue;
            }
            table.add(text.into(), count);
        }
        table
    }

    /// Record one raw occurrence. Returns false when the comment was dropped.
    pub fn record(&mut self, comment: &str) -> bool {
        if comment.trim().is_empty() {
            return false;
        }
        self.add(comment.to_string(), 1);
        true
    }

    fn add(&mut self, text: String, count: usize) {
        match self.index.get(&text) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(text.clone(), self.entries.len());
                self.entries.push((text, count));
            }
        }
        self.total += count;
    }

    /// Occurrence count for `text`, 0 when absent
    pub fn count(&self, text: &str) -> usize {
        self.index
            .get(text)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Whether `text` was seen
    pub fn contains(&self, text: &str) -> bool {
        self.index.contains_key(text)
    }

    /// Total raw count, including duplicates
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of unique comments
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// True when no comment was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unique comments in first-occurrence order
    pub fn unique(&self) -> Vec<String> {
        self.entries.iter().map(|(text, _)| text.clone()).collect()
    }

    /// Iterate `(text, count)` pairs in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|(text, count)| (text.as_str(), *count))
    }
}
