//! Word frequency extraction for the word cloud

use danmu_core::{FrequencyTable, TermFrequency, TermFrequencyTable};
use std::collections::HashMap;

/// Number of terms kept by default
pub const DEFAULT_TERM_LIMIT: usize = 50;

const TERM_DELIMITERS: &[char] = &[',', '，', '。', '！', '？', '；', ';', '.', '!', '?'];

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || TERM_DELIMITERS.contains(&c)
}

fn is_term(token: &str) -> bool {
    token.chars().count() > 1
}

/// Split a comment on whitespace and CJK/ASCII punctuation, keeping tokens
/// longer than one character
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(is_delimiter).filter(|token| is_term(token)).collect()
}

/// Ranks terms across comments, weighting each by its comment's occurrence
/// count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordFrequencyExtractor {
    limit: usize,
}

impl Default for WordFrequencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl WordFrequencyExtractor {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_TERM_LIMIT,
        }
    }

    /// Keep at most `limit` terms
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Build the ranked term table.
    ///
    /// `remote` optionally maps a comment to words segmented by a remote
    /// service; a comment with no usable remote words is tokenized locally.
    /// A comment missing from `table` is weighted 1. Ties keep first-seen
    /// order.
    pub fn extract(
        &self,
        comments: &[String],
        table: &FrequencyTable,
        remote: Option<&HashMap<String, Vec<String>>>,
    ) -> TermFrequencyTable {
        let mut weights: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for comment in comments {
            let weight = match table.count(comment) {
                0 => 1,
                n => n,
            };

            let remote_words: Vec<&str> = remote
                .and_then(|words| words.get(comment))
                .map(|words| {
                    words
                        .iter()
                        .map(|w| w.trim())
                        .filter(|w| is_term(w))
                        .collect()
                })
                .unwrap_or_default();

            let tokens = if remote_words.is_empty() {
                tokenize(comment)
            } else {
                remote_words
            };

            for token in tokens {
                let entry = weights.entry(token).or_insert_with(|| {
                    order.push(token);
                    0
                });
                *entry += weight;
            }
        }

        let mut ranked: TermFrequencyTable = order
            .into_iter()
            .map(|term| TermFrequency {
                term: term.to_string(),
                weight: weights.get(term).copied().unwrap_or(0),
            })
            .collect();

        ranked.sort_by(|a, b| b.weight.cmp(&a.weight));
        ranked.truncate(self.limit);
        ranked
    }
}
