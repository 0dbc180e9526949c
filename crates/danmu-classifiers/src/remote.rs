//! Remote LLM classifier with local fallback
//!
//! Sends the unique comment list to the configured provider in a single
//! prompt and parses the `comment -> label` reply. Any failure, a timeout,
//! or a reply with nothing usable in it resolves to the keyword lexicon, so
//! [`Classifier::classify`] on this type never returns an error.

use crate::classifier::{ClassificationOutcome, ClassificationSource, Classifier, FallbackReason};
use crate::config::ProviderConfig;
use crate::lexicon::LexiconClassifier;
use crate::response::parse_classification;
use crate::transport::send_prompt;
use async_trait::async_trait;
use danmu_core::{Classification, DisplayLanguage, ProviderAdapter, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Classifier backed by a remote text-generation service
#[derive(Debug)]
pub struct RemoteClassifier {
    name: String,
    client: reqwest::Client,
    adapter: Box<dyn ProviderAdapter>,
    config: ProviderConfig,
    language: DisplayLanguage,
    fallback: LexiconClassifier,
}

impl RemoteClassifier {
    /// Create a remote classifier with the default lexicon as fallback
    pub fn new(client: reqwest::Client, config: ProviderConfig) -> Result<Self> {
        Ok(Self::with_fallback(client, config, LexiconClassifier::new()?))
    }

    /// Create a remote classifier with a custom fallback lexicon
    pub fn with_fallback(
        client: reqwest::Client,
        config: ProviderConfig,
        fallback: LexiconClassifier,
    ) -> Self {
        Self {
            name: format!("remote-{}", config.provider),
            client,
            adapter: config.adapter(),
            config,
            language: DisplayLanguage::default(),
            fallback,
        }
    }

    /// Set the language labels are requested and parsed in
    pub fn with_language(mut self, language: DisplayLanguage) -> Self {
        self.language = language;
        self
    }

    /// Provider configuration in use
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn classify_remote(&self, comments: &[String]) -> Result<Classification> {
        let prompt = self.language.classification_prompt(comments);
        let reply = send_prompt(
            &self.client,
            self.adapter.as_ref(),
            &self.config.credential,
            &prompt,
        )
        .await?;
        debug!(reply_chars = reply.chars().count(), "Received classification reply");
        Ok(parse_classification(&reply, self.language))
    }

    fn remote_source(&self) -> ClassificationSource {
        ClassificationSource::Remote {
            provider: self.config.provider.to_string(),
            model: self.adapter.model().to_string(),
        }
    }

    fn fall_back(
        &self,
        comments: &[String],
        reason: FallbackReason,
        start: Instant,
    ) -> ClassificationOutcome {
        metrics::counter!("danmu_classifier_fallbacks_total", "reason" => reason.as_str())
            .increment(1);

        ClassificationOutcome {
            classification: self.fallback.classify_all(comments),
            source: ClassificationSource::Fallback { reason },
            latency_us: start.elapsed().as_micros() as u64,
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, comments: &[String]) -> Result<ClassificationOutcome> {
        let start = Instant::now();

        if !self.config.enabled {
            return Ok(self.fall_back(comments, FallbackReason::Disabled, start));
        }
        if !self.config.has_credential() {
            info!(
                provider = %self.config.provider,
                "No credential configured, using keyword lexicon"
            );
            return Ok(self.fall_back(comments, FallbackReason::MissingCredential, start));
        }
        if comments.is_empty() {
            return Ok(ClassificationOutcome::new(
                Classification::new(),
                self.remote_source(),
            ));
        }

        let outcome =
            tokio::time::timeout(self.config.timeout(), self.classify_remote(comments)).await;

        match outcome {
            Ok(Ok(classification)) if !classification.is_empty() => Ok(ClassificationOutcome {
                classification,
                source: self.remote_source(),
                latency_us: start.elapsed().as_micros() as u64,
            }),
            Ok(Ok(_)) => {
                warn!(
                    provider = %self.config.provider,
                    "Remote reply had no usable lines, using keyword lexicon"
                );
                Ok(self.fall_back(comments, FallbackReason::EmptyResult, start))
            }
            Ok(Err(e)) => {
                warn!(
                    provider = %self.config.provider,
                    error = %e,
                    "Remote classification failed, using keyword lexicon"
                );
                Ok(self.fall_back(comments, FallbackReason::RequestFailed, start))
            }
            Err(_) => {
                warn!(
                    provider = %self.config.provider,
                    timeout_secs = self.config.timeout().as_secs(),
                    "Remote classification timed out, using keyword lexicon"
                );
                Ok(self.fall_back(comments, FallbackReason::Timeout, start))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
