//! Keyword lexicon sentiment classifier
//!
//! This is the always-available classifier: the default when remote
//! classification is off and the fallback whenever it fails.

use crate::classifier::{ClassificationOutcome, ClassificationSource, Classifier};
use aho_corasick::AhoCorasick;
use danmu_core::{Classification, Result, SentimentClass};
use std::time::Instant;

/// Default positive keywords
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "精彩", "不错", "好", "棒", "666", "加油", "爱了", "喜欢", "厉害", "优秀", "好看", "好评", "赞",
    "支持",
];

/// Default negative keywords
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "不好", "无聊", "差", "垃圾", "失望", "一般", "讨厌", "烂", "low", "恶心", "糟糕",
];

/// Case-sensitive substring matcher over two keyword sets.
///
/// A comment containing any positive keyword is Positive, otherwise one
/// containing any negative keyword is Negative, otherwise Neutral. Because
/// positive keywords are checked first, `不好` is Positive (it contains `好`).
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
}

impl LexiconClassifier {
    /// Create a classifier with the default keyword sets
    pub fn new() -> Result<Self> {
        Self::with_keywords("lexicon", POSITIVE_KEYWORDS, NEGATIVE_KEYWORDS)
    }

    /// Create a classifier with custom keyword sets. Empty keywords are ignored.
    pub fn with_keywords<S: AsRef<str>>(
        name: impl Into<String>,
        positive: &[S],
        negative: &[S],
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            positive: build_matcher("positive", positive)?,
            negative: build_matcher("negative", negative)?,
        })
    }

    /// Classify one comment
    pub fn classify_text(&self, text: &str) -> SentimentClass {
        if self.positive.is_match(text) {
            SentimentClass::Positive
        } else if self.negative.is_match(text) {
            SentimentClass::Negative
        } else {
            SentimentClass::Neutral
        }
    }

    /// Partition `comments` into the three buckets, preserving input order
    /// within each bucket
    pub fn classify_all(&self, comments: &[String]) -> Classification {
        let mut classification = Classification::new();
        for text in comments {
            classification.push(self.classify_text(text), text.as_str());
        }
        classification
    }
}

fn build_matcher<S: AsRef<str>>(label: &str, keywords: &[S]) -> Result<AhoCorasick> {
    let keywords: Vec<&str> = keywords
        .iter()
        .map(|k| k.as_ref())
        .filter(|k| !k.is_empty())
        .collect();

    AhoCorasick::new(keywords).map_err(|e| {
        danmu_core::Error::config(format!("Failed to build {label} keyword matcher: {e}"))
    })
}

#[async_trait::async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, comments: &[String]) -> Result<ClassificationOutcome> {
        let start = Instant::now();
        let classification = self.classify_all(comments);

        Ok(ClassificationOutcome {
            classification,
            source: ClassificationSource::Local,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_keywords() {
        let classifier = LexiconClassifier::new().unwrap();
        let result = classifier.classify_all(&strings(&["好棒", "无聊", "随便说说"]));

        assert_eq!(result.positive, vec!["好棒"]);
        assert_eq!(result.negative, vec!["无聊"]);
        assert_eq!(result.neutral, vec!["随便说说"]);
    }

    #[test]
    fn test_positive_takes_precedence() {
        let classifier = LexiconClassifier::new().unwrap();

        // "不好" contains the positive keyword "好"
        assert_eq!(classifier.classify_text("不好"), SentimentClass::Positive);
        assert_eq!(classifier.classify_text("又差又赞"), SentimentClass::Positive);
        assert_eq!(classifier.classify_text("太差了"), SentimentClass::Negative);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let classifier = LexiconClassifier::new().unwrap();

        assert_eq!(classifier.classify_text("so low"), SentimentClass::Negative);
        assert_eq!(classifier.classify_text("so LOW"), SentimentClass::Neutral);
    }

    #[test]
    fn test_custom_keywords_ignore_empty() {
        let classifier =
            LexiconClassifier::with_keywords("custom", &["great", ""], &["awful"]).unwrap();

        assert_eq!(classifier.classify_text("great show"), SentimentClass::Positive);
        assert_eq!(classifier.classify_text("awful show"), SentimentClass::Negative);
        assert_eq!(classifier.classify_text("a show"), SentimentClass::Neutral);
    }

    #[tokio::test]
    async fn test_classifier_trait_reports_local_source() {
        let classifier = LexiconClassifier::new().unwrap();
        let outcome = classifier.classify(&strings(&["666"])).await.unwrap();

        assert_eq!(outcome.source, ClassificationSource::Local);
        assert_eq!(outcome.classification.positive, vec!["666"]);
        assert_eq!(classifier.name(), "lexicon");
    }
}
