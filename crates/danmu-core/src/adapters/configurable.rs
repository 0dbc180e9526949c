//! Configurable Provider Adapter
//!
//! A generic adapter that can be configured for providers whose payload or
//! auth differs from the chat completions dialect, using JSONPath-like reply
//! extraction.

use crate::error::{Error, Result};
use crate::provider::{ProviderAdapter, ProviderRequest, DEFAULT_MAX_TOKENS};
use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// How the credential is attached to the request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <credential>`
    #[default]
    Bearer,

    /// Credential sent verbatim in a named header (e.g. `x-api-key`)
    Header { name: String },
}

/// Configuration for a custom provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Adapter name
    pub name: String,

    /// Endpoint URL (POST)
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Credential placement
    #[serde(default)]
    pub auth: AuthScheme,

    /// Additional static headers (e.g. API version pins)
    #[serde(default)]
    pub extra_headers: Vec<(String, String)>,

    /// Path to the reply text (dot-notation or simple JSONPath)
    /// Examples: "content[0].text", "choices[0].message.content"
    pub content_path: String,

    /// Token budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// A configurable provider adapter
#[derive(Debug, Clone)]
pub struct ConfigurableAdapter {
    config: AdapterConfig,
}

impl ConfigurableAdapter {
    /// Create a new configurable adapter
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    /// Override the endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Override the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Extract value from JSON using a simple path notation
    fn extract_path<'a>(
        &self,
        value: &'a serde_json::Value,
        path: &str,
    ) -> Option<&'a serde_json::Value> {
        let mut current = value;

        for part in path.split('.') {
            // Handle array index notation: "content[0]"
            if let Some(bracket_pos) = part.find('[') {
                let key = &part[..bracket_pos];
                let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

                if !key.is_empty() {
                    current = current.get(key)?;
                }

                let index: usize = index_str.parse().ok()?;
                current = current.get(index)?;
            } else {
                current = current.get(part)?;
            }
        }

        Some(current)
    }
}

impl ProviderAdapter for ConfigurableAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, prompt: &str, credential: &str) -> ProviderRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        match &self.config.auth {
            AuthScheme::Bearer => {
                headers.push(("Authorization".to_string(), format!("Bearer {credential}")));
            }
            AuthScheme::Header { name } => {
                headers.push((name.clone(), credential.to_string()));
            }
        }
        headers.extend(self.config.extra_headers.iter().cloned());

        ProviderRequest {
            url: self.config.endpoint.clone(),
            headers,
            body: serde_json::json!({
                "model": self.config.model,
                "messages": [ChatMessage::user(prompt)],
                "max_tokens": self.config.max_tokens,
            }),
        }
    }

    fn extract_text(&self, raw: &str) -> Result<String> {
        let json: serde_json::Value = serde_json::from_str(raw)?;

        self.extract_path(&json, &self.config.content_path)
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::remote_classification(format!(
                    "{} response has no {}",
                    self.config.name, self.config.content_path
                ))
            })
    }
}

// =============================================================================
// Pre-built Adapters
// =============================================================================

/// Create an Anthropic Messages API adapter
///
/// Anthropic format:
/// ```text
/// POST /v1/messages
/// x-api-key: <key>
/// anthropic-version: 2023-06-01
///
/// {"id":"msg_xxx","type":"message","content":[{"type":"text","text":"..."}]}
/// ```
pub fn anthropic_adapter() -> ConfigurableAdapter {
    ConfigurableAdapter::new(AdapterConfig {
        name: "anthropic".to_string(),
        endpoint: "https://api.anthropic.com/v1/messages".to_string(),
        model: "claude-3-haiku-20240307".to_string(),
        auth: AuthScheme::Header {
            name: "x-api-key".to_string(),
        },
        extra_headers: vec![("anthropic-version".to_string(), "2023-06-01".to_string())],
        content_path: "content[0].text".to_string(),
        max_tokens: DEFAULT_MAX_TOKENS,
    })
}
