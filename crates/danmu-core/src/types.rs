//! Core types shared by the classifiers, the comment source and consumers

use serde::{Deserialize, Serialize};

/// Sentiment of a single comment.
///
/// The variants form an exhaustive, mutually exclusive partition. When more
/// than one keyword category could apply, precedence is Positive, then
/// Negative, then Neutral (see [`SentimentClass::PRECEDENCE`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentClass {
    Positive,
    Negative,
    Neutral,
}

impl SentimentClass {
    /// Evaluation order used by every classifier
    pub const PRECEDENCE: [SentimentClass; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partition of a list of unique comments into the three sentiment buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

impl Classification {
    /// Create an empty classification
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment to the bucket for `class`
    pub fn push(&mut self, class: SentimentClass, text: impl Into<String>) {
        self.bucket_mut(class).push(text.into());
    }

    /// Comments assigned to `class`
    pub fn bucket(&self, class: SentimentClass) -> &[String] {
        match class {
            SentimentClass::Positive => &self.positive,
            SentimentClass::Negative => &self.negative,
            SentimentClass::Neutral => &self.neutral,
        }
    }

    fn bucket_mut(&mut self, class: SentimentClass) -> &mut Vec<String> {
        match class {
            SentimentClass::Positive => &mut self.positive,
            SentimentClass::Negative => &mut self.negative,
            SentimentClass::Neutral => &mut self.neutral,
        }
    }

    /// Total number of classified comments across all buckets
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len() + self.neutral.len()
    }

    /// True when all three buckets are empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(class, comment)` pairs in precedence order
    pub fn iter(&self) -> impl Iterator<Item = (SentimentClass, &str)> {
        SentimentClass::PRECEDENCE.into_iter().flat_map(move |class| {
            self.bucket(class)
                .iter()
                .map(move |text| (class, text.as_str()))
        })
    }
}

/// Classification where every comment is repeated by its occurrence count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedClassification {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
}

impl WeightedClassification {
    /// Weighted comments assigned to `class`
    pub fn bucket(&self, class: SentimentClass) -> &[String] {
        match class {
            SentimentClass::Positive => &self.positive,
            SentimentClass::Negative => &self.negative,
            SentimentClass::Neutral => &self.neutral,
        }
    }

    fn bucket_mut(&mut self, class: SentimentClass) -> &mut Vec<String> {
        match class {
            SentimentClass::Positive => &mut self.positive,
            SentimentClass::Negative => &mut self.negative,
            SentimentClass::Neutral => &mut self.neutral,
        }
    }

    /// Append `count` repetitions of `text` to the bucket for `class`
    pub fn extend_repeated(&mut self, class: SentimentClass, text: &str, count: usize) {
        self.bucket_mut(class)
            .extend(std::iter::repeat(text.to_string()).take(count));
    }

    /// Sum of bucket lengths
    pub fn total(&self) -> usize {
        self.positive.len() + self.negative.len() + self.neutral.len()
    }
}

/// Summary counts and distribution derived from a weighted classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentSummary {
    /// Count each bucket of a weighted classification
    pub fn from_weighted(weighted: &WeightedClassification) -> Self {
        Self {
            total: weighted.total(),
            positive: weighted.positive.len(),
            negative: weighted.negative.len(),
            neutral: weighted.neutral.len(),
        }
    }

    /// Count for one class
    pub fn count(&self, class: SentimentClass) -> usize {
        match class {
            SentimentClass::Positive => self.positive,
            SentimentClass::Negative => self.negative,
            SentimentClass::Neutral => self.neutral,
        }
    }

    /// Percentage share of `class` (0.0 when there is no data)
    pub fn share(&self, class: SentimentClass) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(class) as f64 * 100.0 / self.total as f64
        }
    }
}

/// A chat message sent to a remote provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// A single ranked term in the word-frequency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub term: String,
    pub weight: usize,
}

/// Ranked term-frequency table, descending by weight
pub type TermFrequencyTable = Vec<TermFrequency>;
