//! Settings for an analysis run
//!
//! Settings are read once per run from a [`SettingsStore`] and never written
//! back by the pipeline.

use async_trait::async_trait;
use danmu_core::adapters::adapter_with_overrides;
use danmu_core::{DisplayLanguage, ProviderAdapter, ProviderId, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Default bound on a remote call
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 12;

/// Environment variable consulted when no credential is configured
pub const CREDENTIAL_ENV: &str = "DANMU_LLM_API_KEY";

/// Remote classification provider settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Use the remote provider at all
    #[serde(default)]
    pub enabled: bool,

    /// Which provider to call
    #[serde(default)]
    pub provider: ProviderId,

    /// Opaque API credential
    #[serde(default)]
    pub credential: String,

    /// Endpoint override (self-hosted gateways, tests)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Model override
    #[serde(default)]
    pub model: Option<String>,

    /// Bound on a single remote call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Remote classification switched on for `provider`
    pub fn new(provider: ProviderId, credential: impl Into<String>) -> Self {
        Self {
            enabled: true,
            provider,
            credential: credential.into(),
            ..Self::default()
        }
    }

    /// Remote classification switched off
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Override the endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the remote timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Whether a non-blank credential is configured
    pub fn has_credential(&self) -> bool {
        !self.credential.trim().is_empty()
    }

    /// Whether a remote call should be attempted at all
    pub fn is_remote_usable(&self) -> bool {
        self.enabled && self.has_credential()
    }

    /// Remote call timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Build the adapter for the configured provider
    pub fn adapter(&self) -> Box<dyn ProviderAdapter> {
        adapter_with_overrides(self.provider, self.endpoint.as_deref(), self.model.as_deref())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: ProviderId::default(),
            credential: String::new(),
            endpoint: None,
            model: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("enabled", &self.enabled)
            .field("provider", &self.provider)
            .field("credential", &if self.has_credential() { "<redacted>" } else { "" })
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

/// Everything an analysis run reads from settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub provider: ProviderConfig,
    pub language: DisplayLanguage,

    /// Ask the provider to segment words for the word cloud
    pub remote_tokenizer: bool,
}

/// Source of settings for analysis runs
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the settings snapshot for one run
    async fn load(&self) -> Result<AnalysisSettings>;
}

/// In-memory settings
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    settings: AnalysisSettings,
}

impl StaticSettings {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    /// Settings with only the provider configured
    pub fn with_provider(provider: ProviderConfig) -> Self {
        Self::new(AnalysisSettings {
            provider,
            ..AnalysisSettings::default()
        })
    }
}

#[async_trait]
impl SettingsStore for StaticSettings {
    async fn load(&self) -> Result<AnalysisSettings> {
        Ok(self.settings.clone())
    }
}

/// Settings document as stored on disk (YAML)
///
/// Every field is optional; missing fields take the same defaults the
/// extension applied when reading its storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    pub use_llm: Option<bool>,
    pub llm_provider: Option<String>,
    pub llm_api_key: Option<String>,
    pub language: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub remote_tokenizer: Option<bool>,
}

impl SettingsFile {
    /// Settings written on first install: remote off, Groq preselected
    pub fn installed_defaults() -> Self {
        Self {
            use_llm: Some(false),
            llm_provider: Some(ProviderId::Groq.as_str().to_string()),
            llm_api_key: Some(String::new()),
            ..Self::default()
        }
    }

    /// Parse a YAML settings document
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| danmu_core::Error::config(format!("Invalid settings file: {e}")))
    }

    /// Normalize into run settings. Unknown provider ids resolve to the
    /// default provider; `env_credential` fills in a blank key.
    pub fn resolve(&self, env_credential: Option<&str>) -> AnalysisSettings {
        let provider = self
            .llm_provider
            .as_deref()
            .map(ProviderId::from_id_or_default)
            .unwrap_or_default();

        let mut credential = self.llm_api_key.clone().unwrap_or_default();
        if credential.trim().is_empty() {
            if let Some(env) = env_credential.filter(|key| !key.trim().is_empty()) {
                debug!("Using credential from {}", CREDENTIAL_ENV);
                credential = env.to_string();
            }
        }

        AnalysisSettings {
            provider: ProviderConfig {
                enabled: self.use_llm.unwrap_or(false),
                provider,
                credential,
                endpoint: self.endpoint.clone(),
                model: self.model.clone(),
                timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS),
            },
            language: self
                .language
                .as_deref()
                .map(DisplayLanguage::from_code)
                .unwrap_or_default(),
            remote_tokenizer: self.remote_tokenizer.unwrap_or(false),
        }
    }
}

/// Settings read from a YAML file on every load
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the settings document
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettings {
    async fn load(&self) -> Result<AnalysisSettings> {
        let file = if tokio::fs::try_exists(&self.path).await? {
            let content = tokio::fs::read_to_string(&self.path).await?;
            SettingsFile::from_yaml(&content)?
        } else {
            info!(path = %self.path.display(), "Settings file not found, using installed defaults");
            SettingsFile::installed_defaults()
        };

        let env_credential = std::env::var(CREDENTIAL_ENV).ok();
        Ok(file.resolve(env_credential.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_defaults() {
        let settings = SettingsFile::installed_defaults().resolve(None);

        assert!(!settings.provider.enabled);
        assert_eq!(settings.provider.provider, ProviderId::Groq);
        assert!(!settings.provider.has_credential());
        assert_eq!(settings.language, DisplayLanguage::ZhCn);
        assert!(!settings.remote_tokenizer);
    }

    #[test]
    fn test_unknown_provider_uses_default() {
        let file = SettingsFile::from_yaml("use_llm: true\nllm_provider: mistral\nllm_api_key: k\n")
            .unwrap();
        let settings = file.resolve(None);

        assert_eq!(settings.provider.provider, ProviderId::OpenAi);
        assert!(settings.provider.is_remote_usable());
    }

    #[test]
    fn test_missing_provider_uses_default() {
        let settings = SettingsFile::from_yaml("use_llm: true\n").unwrap().resolve(None);
        assert_eq!(settings.provider.provider, ProviderId::OpenAi);
        assert!(!settings.provider.is_remote_usable());
    }

    #[test]
    fn test_env_credential_fills_blank_key() {
        let file = SettingsFile::from_yaml("use_llm: true\nllm_api_key: ''\n").unwrap();
        assert_eq!(file.resolve(Some("env-key")).provider.credential, "env-key");

        let file = SettingsFile::from_yaml("use_llm: true\nllm_api_key: file-key\n").unwrap();
        assert_eq!(file.resolve(Some("env-key")).provider.credential, "file-key");
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = SettingsFile::from_yaml("use_llm: [oops").unwrap_err();
        assert!(matches!(err, danmu_core::Error::Config(_)));
    }

    #[test]
    fn test_debug_redacts_credential() {
        let config = ProviderConfig::new(ProviderId::Anthropic, "sk-secret");
        let debug = format!("{config:?}");

        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_file_settings_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(
            &path,
            "use_llm: true\nllm_provider: anthropic\nllm_api_key: sk-ant\nlanguage: en-US\ntimeout_secs: 5\nremote_tokenizer: true\n",
        )
        .unwrap();

        let settings = FileSettings::new(&path).load().await.unwrap();

        assert_eq!(settings.provider.provider, ProviderId::Anthropic);
        assert_eq!(settings.provider.credential, "sk-ant");
        assert_eq!(settings.provider.timeout(), Duration::from_secs(5));
        assert_eq!(settings.language, DisplayLanguage::EnUs);
        assert!(settings.remote_tokenizer);
    }

    #[tokio::test]
    async fn test_missing_file_uses_installed_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FileSettings::new(dir.path().join("absent.yaml"))
            .load()
            .await
            .unwrap();

        assert_eq!(settings.provider.provider, ProviderId::Groq);
    }
}
