//! HTTP round trip shared by the remote classifier and the remote tokenizer

use danmu_core::{ProviderAdapter, Result};
use tracing::debug;

/// Send `prompt` through `adapter` and return the extracted reply text.
///
/// Non-success status codes, transport errors, malformed JSON and missing
/// reply fields all come back as errors; callers decide how to recover.
pub(crate) async fn send_prompt(
    client: &reqwest::Client,
    adapter: &dyn ProviderAdapter,
    credential: &str,
    prompt: &str,
) -> Result<String> {
    let request = adapter.build_request(prompt, credential);
    debug!(
        provider = adapter.name(),
        model = adapter.model(),
        url = %request.url,
        prompt_chars = prompt.chars().count(),
        "Sending provider request"
    );

    let mut builder = client.post(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let response = builder
        .body(request.body.to_string())
        .send()
        .await?
        .error_for_status()?;

    let raw = response.text().await?;
    adapter.extract_text(&raw)
}
