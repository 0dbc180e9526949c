//! Remote word segmentation
//!
//! Whitespace splitting does little for unspaced Chinese text, so the word
//! cloud can optionally ask the configured provider to segment comments.

use crate::config::ProviderConfig;
use crate::response::parse_labelled_lines;
use crate::transport::send_prompt;
use async_trait::async_trait;
use danmu_core::{DisplayLanguage, Error, ProviderAdapter, Result};
use std::collections::HashMap;
use tracing::debug;

/// Segments comments into words
#[async_trait]
pub trait RemoteTokenizer: Send + Sync {
    /// Map each comment to its words. Comments the service skipped are
    /// simply absent from the map.
    async fn tokenize(&self, comments: &[String]) -> Result<HashMap<String, Vec<String>>>;
}

/// Tokenizer that prompts an LLM provider
#[derive(Debug)]
pub struct LlmTokenizer {
    client: reqwest::Client,
    adapter: Box<dyn ProviderAdapter>,
    config: ProviderConfig,
    language: DisplayLanguage,
}

impl LlmTokenizer {
    pub fn new(
        client: reqwest::Client,
        config: ProviderConfig,
        language: DisplayLanguage,
    ) -> Self {
        Self {
            client,
            adapter: config.adapter(),
            config,
            language,
        }
    }
}

#[async_trait]
impl RemoteTokenizer for LlmTokenizer {
    async fn tokenize(&self, comments: &[String]) -> Result<HashMap<String, Vec<String>>> {
        if comments.is_empty() {
            return Ok(HashMap::new());
        }

        let prompt = self.language.tokenization_prompt(comments);
        let request = send_prompt(
            &self.client,
            self.adapter.as_ref(),
            &self.config.credential,
            &prompt,
        );
        let reply = tokio::time::timeout(self.config.timeout(), request)
            .await
            .map_err(|_| {
                Error::remote_tokenization(format!(
                    "timed out after {}s",
                    self.config.timeout().as_secs()
                ))
            })?
            .map_err(|e| Error::remote_tokenization(e.to_string()))?;

        let mut words: HashMap<String, Vec<String>> = HashMap::new();
        for (comment, value) in parse_labelled_lines(&reply) {
            words
                .entry(comment)
                .or_insert_with(|| value.split_whitespace().map(str::to_string).collect());
        }

        debug!(
            segmented = words.len(),
            requested = comments.len(),
            "Remote tokenization complete"
        );
        Ok(words)
    }
}
