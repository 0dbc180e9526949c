//! Analysis pipeline
//!
//! One run: fetch comments, aggregate them, classify the unique list while
//! extracting word frequencies, then expand the classification back to raw
//! counts and assemble an [`AnalysisReport`].

use crate::classifier::{ClassificationOutcome, ClassificationSource, Classifier, FallbackReason};
use crate::config::{AnalysisSettings, SettingsStore};
use crate::lexicon::LexiconClassifier;
use crate::remote::RemoteClassifier;
use crate::session::{AnalysisSession, SessionRegistry};
use crate::terms::{WordFrequencyExtractor, DEFAULT_TERM_LIMIT};
use crate::tokenizer::{LlmTokenizer, RemoteTokenizer};
use crate::weighting::expand_weights;
use chrono::{DateTime, Utc};
use danmu_core::{
    CommentSource, DisplayLanguage, FrequencyTable, Result, SentimentSummary, TermFrequencyTable,
    WeightedClassification,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Tunables for the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Number of terms kept in the word-frequency table
    pub top_terms: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_terms: DEFAULT_TERM_LIMIT,
        }
    }
}

/// Everything produced by one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub video_id: String,
    pub generated_at: DateTime<Utc>,
    pub language: DisplayLanguage,

    /// Raw comment count, duplicates included
    pub total_count: usize,
    pub unique_count: usize,

    /// Where the classification came from
    pub source: ClassificationSource,
    pub summary: SentimentSummary,
    pub weighted: WeightedClassification,
    pub terms: TermFrequencyTable,

    /// Wall time of the run after comments were available
    pub latency_us: u64,
}

/// Result of [`AnalysisPipeline::analyze_video`]
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Report(Box<AnalysisReport>),

    /// The source returned no usable comments
    NoData,

    /// A newer run for the same video replaced this one
    Superseded,
}

impl AnalysisOutcome {
    /// The report, if the run produced one
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            Self::Report(report) => Some(report.as_ref()),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Report(_) => "report",
            Self::NoData => "no_data",
            Self::Superseded => "superseded",
        }
    }
}

/// Drives analysis runs against a comment source
pub struct AnalysisPipeline {
    source: Arc<dyn CommentSource>,
    settings: Arc<dyn SettingsStore>,
    sessions: SessionRegistry,
    client: reqwest::Client,
    options: PipelineOptions,
    lexicon: LexiconClassifier,
    classifier: Option<Arc<dyn Classifier>>,
    tokenizer: Option<Arc<dyn RemoteTokenizer>>,
}

impl AnalysisPipeline {
    /// Create a pipeline with the default keyword lexicon
    pub fn new(source: Arc<dyn CommentSource>, settings: Arc<dyn SettingsStore>) -> Result<Self> {
        Ok(Self {
            source,
            settings,
            sessions: SessionRegistry::new(),
            client: reqwest::Client::new(),
            options: PipelineOptions::default(),
            lexicon: LexiconClassifier::new()?,
            classifier: None,
            tokenizer: None,
        })
    }

    /// Use a shared HTTP client for remote calls
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the keyword lexicon used locally and as fallback
    pub fn with_lexicon(mut self, lexicon: LexiconClassifier) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Always classify with `classifier` instead of choosing from settings.
    /// Errors from it still fall back to the lexicon.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Segment words with `tokenizer` whenever settings enable remote
    /// tokenization
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn RemoteTokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    /// Session registry guarding runs of this pipeline
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Fetch comments for `video_id` and analyze them.
    ///
    /// Fails only when the comment source is unavailable; classification
    /// problems always resolve to the keyword lexicon.
    pub async fn analyze_video(&self, video_id: &str) -> Result<AnalysisOutcome> {
        let session = self.sessions.begin(video_id);
        info!(
            video_id,
            session = session.id(),
            source = self.source.name(),
            "Starting analysis"
        );

        let comments = tokio::select! {
            biased;
            _ = session.cancelled() => return Ok(self.finish(AnalysisOutcome::Superseded)),
            comments = self.source.fetch_comments(video_id) => comments?,
        };

        self.run(&session, comments).await
    }

    /// Analyze comments already in hand, under the same single-flight guard
    pub async fn analyze_comments(
        &self,
        video_id: &str,
        comments: Vec<String>,
    ) -> Result<AnalysisOutcome> {
        let session = self.sessions.begin(video_id);
        self.run(&session, comments).await
    }

    async fn run(
        &self,
        session: &AnalysisSession,
        comments: Vec<String>,
    ) -> Result<AnalysisOutcome> {
        let start = Instant::now();

        let table = FrequencyTable::aggregate(&comments);
        drop(comments);
        if table.is_empty() {
            info!(video_id = session.video_id(), "No comments to analyze");
            return Ok(self.finish(AnalysisOutcome::NoData));
        }

        let settings = match self.settings.load().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Failed to load settings, using defaults");
                AnalysisSettings::default()
            }
        };

        let unique = table.unique();
        debug!(
            video_id = session.video_id(),
            total = table.total(),
            unique = unique.len(),
            "Aggregated comments"
        );

        let work = async {
            tokio::join!(
                self.classify(&unique, &settings),
                self.extract_terms(&unique, &table, &settings)
            )
        };

        let (outcome, terms) = tokio::select! {
            biased;
            _ = session.cancelled() => return Ok(self.finish(AnalysisOutcome::Superseded)),
            result = work => result,
        };

        if session.is_cancelled() {
            return Ok(self.finish(AnalysisOutcome::Superseded));
        }

        let weighted = expand_weights(&outcome.classification, &table);
        let summary = SentimentSummary::from_weighted(&weighted);
        let latency_us = start.elapsed().as_micros() as u64;

        metrics::histogram!("danmu_pipeline_latency_us").record(latency_us as f64);
        info!(
            video_id = session.video_id(),
            total = summary.total,
            positive = summary.positive,
            negative = summary.negative,
            neutral = summary.neutral,
            local = outcome.is_local(),
            latency_us,
            "Analysis complete"
        );

        let report = AnalysisReport {
            video_id: session.video_id().to_string(),
            generated_at: Utc::now(),
            language: settings.language,
            total_count: table.total(),
            unique_count: table.unique_count(),
            source: outcome.source,
            summary,
            weighted,
            terms,
            latency_us,
        };

        Ok(self.finish(AnalysisOutcome::Report(Box::new(report))))
    }

    async fn classify(
        &self,
        unique: &[String],
        settings: &AnalysisSettings,
    ) -> ClassificationOutcome {
        let result = match &self.classifier {
            Some(classifier) => classifier.classify(unique).await,
            None if settings.provider.enabled => {
                RemoteClassifier::with_fallback(
                    self.client.clone(),
                    settings.provider.clone(),
                    self.lexicon.clone(),
                )
                .with_language(settings.language)
                .classify(unique)
                .await
            }
            None => self.lexicon.classify(unique).await,
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Classifier failed, using keyword lexicon");
                let reason = FallbackReason::RequestFailed;
                metrics::counter!("danmu_classifier_fallbacks_total", "reason" => reason.as_str())
                    .increment(1);
                ClassificationOutcome::new(
                    self.lexicon.classify_all(unique),
                    ClassificationSource::Fallback { reason },
                )
            }
        }
    }

    async fn extract_terms(
        &self,
        unique: &[String],
        table: &FrequencyTable,
        settings: &AnalysisSettings,
    ) -> TermFrequencyTable {
        let extractor = WordFrequencyExtractor::with_limit(self.options.top_terms);

        let remote = if settings.remote_tokenizer && settings.provider.is_remote_usable() {
            self.tokenize_remote(unique, settings).await
        } else {
            None
        };

        extractor.extract(unique, table, remote.as_ref())
    }

    async fn tokenize_remote(
        &self,
        unique: &[String],
        settings: &AnalysisSettings,
    ) -> Option<HashMap<String, Vec<String>>> {
        let result = match &self.tokenizer {
            Some(tokenizer) => tokenizer.tokenize(unique).await,
            None => {
                LlmTokenizer::new(self.client.clone(), settings.provider.clone(), settings.language)
                    .tokenize(unique)
                    .await
            }
        };

        match result {
            Ok(words) if !words.is_empty() => Some(words),
            Ok(_) => {
                debug!("Remote tokenizer returned nothing, tokenizing locally");
                None
            }
            Err(e) => {
                warn!(error = %e, "Remote tokenization failed, tokenizing locally");
                None
            }
        }
    }

    fn finish(&self, outcome: AnalysisOutcome) -> AnalysisOutcome {
        metrics::counter!("danmu_analysis_runs_total", "outcome" => outcome.label()).increment(1);
        outcome
    }
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("source", &self.source.name())
            .field("options", &self.options)
            .field("lexicon", &self.lexicon.name())
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .finish()
    }
}
