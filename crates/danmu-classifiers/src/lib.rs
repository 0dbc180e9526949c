//! danmu classifiers
//!
//! Sentiment classification and word statistics for danmu comment streams.
//!
//! Classification runs on the unique comment list only:
//! - [`LexiconClassifier`]: keyword lexicon, always available, never fails
//! - [`RemoteClassifier`]: one batched prompt to an LLM provider, falling
//!   back to the lexicon on any failure
//!
//! [`expand_weights`] restores raw counts afterwards, and
//! [`WordFrequencyExtractor`] ranks terms for the word cloud.
//! [`AnalysisPipeline`] ties everything to a [`danmu_core::CommentSource`].

pub mod classifier;
pub mod config;
pub mod lexicon;
pub mod pipeline;
pub mod remote;
pub mod response;
pub mod session;
pub mod terms;
pub mod tokenizer;
mod transport;
pub mod weighting;

pub use classifier::{ClassificationOutcome, ClassificationSource, Classifier, FallbackReason};
pub use config::{
    AnalysisSettings, FileSettings, ProviderConfig, SettingsFile, SettingsStore, StaticSettings,
};
pub use lexicon::{LexiconClassifier, NEGATIVE_KEYWORDS, POSITIVE_KEYWORDS};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, AnalysisReport, PipelineOptions};
pub use remote::RemoteClassifier;
pub use response::{parse_classification, parse_labelled_lines};
pub use session::{AnalysisSession, SessionRegistry};
pub use terms::{tokenize, WordFrequencyExtractor, DEFAULT_TERM_LIMIT};
pub use tokenizer::{LlmTokenizer, RemoteTokenizer};
pub use weighting::expand_weights;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationOutcome, ClassificationSource, Classifier};
    pub use crate::config::{ProviderConfig, SettingsStore};
    pub use crate::lexicon::LexiconClassifier;
    pub use crate::pipeline::{AnalysisOutcome, AnalysisPipeline, AnalysisReport};
    pub use crate::remote::RemoteClassifier;
}
