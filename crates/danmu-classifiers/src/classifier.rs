//! Classifier trait and common types

use async_trait::async_trait;
use danmu_core::{Classification, Result};
use serde::Serialize;

/// Trait for all batch sentiment classifiers
///
/// A classifier receives the unique comment list of one analysis run and
/// partitions it into the three sentiment buckets.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify every comment in `comments`
    async fn classify(&self, comments: &[String]) -> Result<ClassificationOutcome>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classifying one batch
#[derive(Debug, Clone)]
pub struct ClassificationOutcome {
    /// Per-unique-comment classification
    pub classification: Classification,

    /// Where the classification came from
    pub source: ClassificationSource,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationOutcome {
    /// Create an outcome with zero latency
    pub fn new(classification: Classification, source: ClassificationSource) -> Self {
        Self {
            classification,
            source,
            latency_us: 0,
        }
    }

    /// Whether the local lexicon produced this result
    pub fn is_local(&self) -> bool {
        !matches!(self.source, ClassificationSource::Remote { .. })
    }
}

/// Provenance of a classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Keyword lexicon was the configured classifier
    Local,

    /// Remote provider answered with a usable classification
    Remote { provider: String, model: String },

    /// Remote path was skipped or failed; the keyword lexicon answered
    Fallback { reason: FallbackReason },
}

/// Why the remote path did not produce the classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Remote classification is switched off
    Disabled,

    /// No credential configured
    MissingCredential,

    /// Network, HTTP status, or response-shape failure
    RequestFailed,

    /// No answer within the configured timeout
    Timeout,

    /// The reply parsed to zero items in every bucket
    EmptyResult,
}

impl FallbackReason {
    /// Stable identifier, used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::MissingCredential => "missing_credential",
            Self::RequestFailed => "request_failed",
            Self::Timeout => "timeout",
            Self::EmptyResult => "empty_result",
        }
    }
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
