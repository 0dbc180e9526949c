//! OpenAI-compatible Chat Completions Adapter
//!
//! Covers every provider that speaks the chat completions dialect
//! (OpenAI, Groq, Moonshot):
//! ```text
//! POST /v1/chat/completions
//! Authorization: Bearer <key>
//! {"model":"gpt-3.5-turbo","messages":[{"role":"user","content":"..."}],"max_tokens":2000}
//!
//! {"id":"chatcmpl-xxx","choices":[{"index":0,"message":{"role":"assistant","content":"..."}}]}
//! ```

use crate::error::{Error, Result};
use crate::provider::{ProviderAdapter, ProviderRequest, DEFAULT_MAX_TOKENS};
use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// OpenAI chat completions endpoint
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
/// Groq's OpenAI-compatible endpoint
pub const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
/// Moonshot's OpenAI-compatible endpoint
pub const MOONSHOT_ENDPOINT: &str = "https://api.moonshot.cn/v1/chat/completions";

/// Chat completions adapter
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    name: String,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiAdapter {
    /// Create an adapter for an arbitrary chat completions endpoint
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// OpenAI with gpt-3.5-turbo
    pub fn openai() -> Self {
        Self::new("openai", OPENAI_ENDPOINT, "gpt-3.5-turbo")
    }

    /// Groq with Llama 4 Maverick
    pub fn groq() -> Self {
        Self::new(
            "groq",
            GROQ_ENDPOINT,
            "meta-llama/llama-4-maverick-17b-128e-instruct",
        )
    }

    /// Moonshot with the 8k context model
    pub fn moonshot() -> Self {
        Self::new("moonshot", MOONSHOT_ENDPOINT, "moonshot-v1-8k")
    }

    /// Override the endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl Default for OpenAiAdapter {
    fn default() -> Self {
        Self::openai()
    }
}

impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, prompt: &str, credential: &str) -> ProviderRequest {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
        };

        ProviderRequest {
            url: self.endpoint.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), format!("Bearer {credential}")),
            ],
            body: serde_json::json!(body),
        }
    }

    fn extract_text(&self, raw: &str) -> Result<String> {
        let response: ChatCompletionResponse = serde_json::from_str(raw)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                Error::remote_classification(format!(
                    "{} response has no choices[0].message.content",
                    self.name
                ))
            })
    }
}

// =============================================================================
// Chat Completions Structures
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_shape() {
        let adapter = OpenAiAdapter::groq();
        let request = adapter.build_request("classify this", "gsk-test");

        assert_eq!(request.url, GROQ_ENDPOINT);
        assert_eq!(request.header("Authorization"), Some("Bearer gsk-test"));
        assert_eq!(
            request.body["model"],
            "meta-llama/llama-4-maverick-17b-128e-instruct"
        );
        assert_eq!(request.body["messages"][0]["role"], "user");
        assert_eq!(request.body["messages"][0]["content"], "classify this");
        assert_eq!(request.body["max_tokens"], 2000);
    }

    #[test]
    fn test_extract_text() {
        let adapter = OpenAiAdapter::openai();
        let raw = r#"{"id":"chatcmpl-123","choices":[{"index":0,"message":{"role":"assistant","content":"好棒 -> 正面"},"finish_reason":"stop"}]}"#;

        assert_eq!(adapter.extract_text(raw).unwrap(), "好棒 -> 正面");
    }

    #[test]
    fn test_extract_text_missing_choices() {
        let adapter = OpenAiAdapter::openai();

        assert!(adapter.extract_text(r#"{"choices":[]}"#).is_err());
        assert!(adapter.extract_text(r#"{"error":{"message":"bad key"}}"#).is_err());
        assert!(adapter.extract_text("not json").is_err());
    }

    #[test]
    fn test_overrides() {
        let adapter = OpenAiAdapter::moonshot()
            .with_endpoint("http://localhost:9999/v1/chat/completions")
            .with_model("moonshot-v1-32k")
            .with_max_tokens(512);
        let request = adapter.build_request("p", "k");

        assert_eq!(request.url, "http://localhost:9999/v1/chat/completions");
        assert_eq!(request.body["model"], "moonshot-v1-32k");
        assert_eq!(request.body["max_tokens"], 512);
    }
}
