//! Provider Adapters
//!
//! Built-in adapters for the supported remote classification providers.

pub mod configurable;
mod openai;

pub use configurable::{anthropic_adapter, AdapterConfig, AuthScheme, ConfigurableAdapter};
pub use openai::{OpenAiAdapter, GROQ_ENDPOINT, MOONSHOT_ENDPOINT, OPENAI_ENDPOINT};

use crate::provider::{AdapterRegistry, ProviderAdapter, ProviderId};

/// Create a default adapter registry with built-in adapters
pub fn default_registry() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();

    for provider in ProviderId::ALL {
        registry.register(provider.as_str(), get_adapter(provider));
    }

    registry
}

/// Get the built-in adapter for a provider
pub fn get_adapter(provider: ProviderId) -> Box<dyn ProviderAdapter> {
    match provider {
        ProviderId::OpenAi => Box::new(OpenAiAdapter::openai()),
        ProviderId::Groq => Box::new(OpenAiAdapter::groq()),
        ProviderId::Moonshot => Box::new(OpenAiAdapter::moonshot()),
        ProviderId::Anthropic => Box::new(configurable::anthropic_adapter()),
    }
}

/// Get the adapter for a provider with optional endpoint/model overrides
pub fn adapter_with_overrides(
    provider: ProviderId,
    endpoint: Option<&str>,
    model: Option<&str>,
) -> Box<dyn ProviderAdapter> {
    match provider {
        ProviderId::Anthropic => {
            let mut adapter = configurable::anthropic_adapter();
            if let Some(endpoint) = endpoint {
                adapter = adapter.with_endpoint(endpoint);
            }
            if let Some(model) = model {
                adapter = adapter.with_model(model);
            }
            Box::new(adapter)
        }
        _ => {
            let mut adapter = match provider {
                ProviderId::Groq => OpenAiAdapter::groq(),
                ProviderId::Moonshot => OpenAiAdapter::moonshot(),
                _ => OpenAiAdapter::openai(),
            };
            if let Some(endpoint) = endpoint {
                adapter = adapter.with_endpoint(endpoint);
            }
            if let Some(model) = model {
                adapter = adapter.with_model(model);
            }
            Box::new(adapter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_all_providers() {
        let registry = default_registry();
        for provider in ProviderId::ALL {
            let adapter = registry.get(provider.as_str()).unwrap();
            assert_eq!(adapter.name(), provider.as_str());
        }
    }

    #[test]
    fn test_overrides_apply_to_anthropic() {
        let adapter = adapter_with_overrides(
            ProviderId::Anthropic,
            Some("http://127.0.0.1:1/v1/messages"),
            Some("claude-3-5-haiku-latest"),
        );
        let request = adapter.build_request("p", "k");

        assert_eq!(request.url, "http://127.0.0.1:1/v1/messages");
        assert_eq!(request.body["model"], "claude-3-5-haiku-latest");
        assert_eq!(request.header("x-api-key"), Some("k"));
    }
}
