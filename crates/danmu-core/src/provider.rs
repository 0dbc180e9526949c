//! Provider Adapter System
//!
//! Provides a pluggable interface for talking to remote text-classification
//! services (OpenAI-compatible chat completions, Anthropic messages, custom
//! endpoints). An adapter only knows how to build a request and how to pull
//! the reply text out of the provider's response envelope; everything after
//! that is provider-agnostic.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Token budget sent with every request
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Known remote classification providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    OpenAi,
    Groq,
    Moonshot,
    Anthropic,
}

impl ProviderId {
    /// All providers, default first
    pub const ALL: [ProviderId; 4] = [Self::OpenAi, Self::Groq, Self::Moonshot, Self::Anthropic];

    /// Look up a provider by id; `None` for unknown ids
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "groq" => Some(Self::Groq),
            "moonshot" => Some(Self::Moonshot),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }

    /// Look up a provider by id, resolving unknown ids to the default provider
    pub fn from_id_or_default(id: &str) -> Self {
        Self::from_id(id).unwrap_or_else(|| {
            tracing::warn!(provider = id, "Unknown provider id, using default provider");
            Self::default()
        })
    }

    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Groq => "groq",
            Self::Moonshot => "moonshot",
            Self::Anthropic => "anthropic",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built HTTP request for a provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Endpoint URL (always POST)
    pub url: String,

    /// Request headers, including the provider-specific auth header
    pub headers: Vec<(String, String)>,

    /// JSON payload
    pub body: serde_json::Value,
}

impl ProviderRequest {
    /// Get a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Trait for building provider requests and normalizing their responses
///
/// Implementations own the endpoint, the auth header shape, the payload
/// schema and the model identifier. The caller never branches on the
/// concrete provider.
pub trait ProviderAdapter: Send + Sync + Debug {
    /// Name of this adapter (for logging/debugging)
    fn name(&self) -> &str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Build a single-message request carrying `prompt`
    fn build_request(&self, prompt: &str, credential: &str) -> ProviderRequest;

    /// Extract the reply text from a raw response body
    ///
    /// Returns an error for malformed JSON or a missing reply field.
    fn extract_text(&self, raw: &str) -> Result<String>;
}

/// Registry of available provider adapters
#[derive(Debug, Default)]
pub struct AdapterRegistry {
    adapters: std::collections::HashMap<String, Box<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter
    pub fn register(&mut self, name: impl Into<String>, adapter: Box<dyn ProviderAdapter>) {
        self.adapters.insert(name.into(), adapter);
    }

    /// Get an adapter by name
    pub fn get(&self, name: &str) -> Option<&dyn ProviderAdapter> {
        self.adapters.get(name).map(|a| a.as_ref())
    }

    /// List all registered adapters
    pub fn list(&self) -> Vec<&str> {
        self.adapters.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id_lookup() {
        assert_eq!(ProviderId::from_id("Groq"), Some(ProviderId::Groq));
        assert_eq!(ProviderId::from_id("mistral"), None);
        assert_eq!(ProviderId::from_id_or_default("mistral"), ProviderId::OpenAi);
        assert_eq!(ProviderId::from_id_or_default(""), ProviderId::OpenAi);
    }

    #[test]
    fn test_request_header_lookup() {
        let request = ProviderRequest {
            url: "https://example.com".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer k".to_string())],
            body: serde_json::json!({}),
        };
        assert_eq!(request.header("authorization"), Some("Bearer k"));
        assert_eq!(request.header("x-api-key"), None);
    }
}
