//! Provider configuration from TOML (`[provider]` section)

use magi_domain::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [provider]
/// provider = "deepseek"
/// model = "deepseek-chat"
/// api_key_env = "DEEPSEEK_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Provider name (openrouter, openai, anthropic, deepseek, ...)
    pub provider: String,
    pub model: String,
    /// Inline API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Full endpoint URL overriding the provider default
    pub api_base: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default().to_string(),
            model: ProviderConfig::DEFAULT_MODEL.to_string(),
            api_key: None,
            api_key_env: "MAGI_API_KEY".to_string(),
            api_base: None,
        }
    }
}

impl FileProviderConfig {
    /// Resolve the API key: inline key first, then the named environment variable.
    pub fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        self.api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .or_else(|| lookup(&self.api_key_env))
            .unwrap_or_default()
    }

    /// Convert to the domain type, reading the key from the process environment.
    pub fn to_provider_config(&self) -> ProviderConfig {
        self.to_provider_config_with(|name| std::env::var(name).ok())
    }

    pub fn to_provider_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ProviderConfig {
        let provider = self.provider.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown provider '{}', falling back to {}",
                self.provider,
                ProviderKind::default()
            );
            ProviderKind::default()
        });

        ProviderConfig {
            provider,
            model: self.model.clone(),
            api_key: self.resolve_api_key(lookup),
            api_base_override: self.api_base.clone().filter(|b| !b.trim().is_empty()),
        }
    }
}
