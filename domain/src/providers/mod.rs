//! Provider settings and endpoint resolution (provider-neutral, serde-free).
//!
//! Every supported provider is reached through an OpenAI-compatible
//! chat-completions call; only the URL differs.

use crate::core::error::DomainError;

/// Known chat-completion providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderKind {
    #[default]
    OpenRouter,
    OpenAi,
    Anthropic,
    Google,
    Zhipu,
    Moonshot,
    Alibaba,
    Baidu,
    DeepSeek,
    Cohere,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 10] = [
        ProviderKind::OpenRouter,
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::Zhipu,
        ProviderKind::Moonshot,
        ProviderKind::Alibaba,
        ProviderKind::Baidu,
        ProviderKind::DeepSeek,
        ProviderKind::Cohere,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::Zhipu => "zhipu",
            ProviderKind::Moonshot => "moonshot",
            ProviderKind::Alibaba => "alibaba",
            ProviderKind::Baidu => "baidu",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Cohere => "cohere",
        }
    }

    /// Default chat-completions URL
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
            ProviderKind::OpenAi => "https://api.openai.com/v1/chat/completions",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1/messages",
            ProviderKind::Google => {
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
            }
            ProviderKind::Zhipu => "https://open.bigmodel.cn/api/paas/v4/chat/completions",
            ProviderKind::Moonshot => "https://api.moonshot.cn/v1/chat/completions",
            ProviderKind::Alibaba => {
                "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation"
            }
            ProviderKind::Baidu => {
                "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/completions"
            }
            ProviderKind::DeepSeek => "https://api.deepseek.com/v1/chat/completions",
            ProviderKind::Cohere => "https://api.cohere.ai/v1/chat",
        }
    }

    /// Parse a provider name, falling back to OpenRouter for anything unknown.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ProviderKind::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| DomainError::UnknownProvider(s.to_string()))
    }
}

/// Resolve the URL to POST chat requests to.
///
/// A non-blank `api_base_override` always wins; otherwise the provider's
/// default endpoint is used.
pub fn resolve_endpoint(provider: ProviderKind, api_base_override: Option<&str>) -> String {
    match api_base_override.map(str::trim) {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => provider.default_endpoint().to_string(),
    }
}

/// Connection settings for one provider
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub model: String,
    /// Secret; never printed
    pub api_key: String,
    pub api_base_override: Option<String>,
}

impl ProviderConfig {
    pub const DEFAULT_MODEL: &'static str = "anthropic/claude-3.5-sonnet";

    pub fn new(provider: ProviderKind, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: api_key.into(),
            api_base_override: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base_override = Some(api_base.into());
        self
    }

    pub fn endpoint(&self) -> String {
        resolve_endpoint(self.provider, self.api_base_override.as_deref())
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Check that model and API key are present.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.model.trim().is_empty() {
            return Err(DomainError::InvalidConfig("model is not set".to_string()));
        }
        if !self.has_api_key() {
            return Err(DomainError::InvalidConfig("API key is not set".to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "<unset>" })
            .field("api_base_override", &self.api_base_override)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(ProviderKind::default(), Self::DEFAULT_MODEL, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_always_wins() {
        for provider in ProviderKind::ALL {
            assert_eq!(
                resolve_endpoint(provider, Some("http://localhost:8080/v1/chat")),
                "http://localhost:8080/v1/chat"
            );
        }
    }

    #[test]
    fn test_blank_override_is_ignored() {
        assert_eq!(
            resolve_endpoint(ProviderKind::DeepSeek, Some("  ")),
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert_eq!(
            resolve_endpoint(ProviderKind::OpenRouter, None),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_unknown_provider_falls_back_to_openrouter() {
        assert!("mistral".parse::<ProviderKind>().is_err());
        assert_eq!(
            ProviderKind::from_name_or_default("mistral"),
            ProviderKind::OpenRouter
        );
        assert_eq!(
            ProviderKind::from_name_or_default(" DeepSeek "),
            ProviderKind::DeepSeek
        );
    }

    #[test]
    fn test_provider_names_round_trip() {
        for provider in ProviderKind::ALL {
            assert_eq!(provider.to_string().parse::<ProviderKind>().ok(), Some(provider));
        }
    }

    #[test]
    fn test_validate() {
        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o", "sk-test");
        assert!(config.validate().is_ok());

        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o", "");
        assert!(matches!(config.validate(), Err(DomainError::InvalidConfig(_))));

        let config = ProviderConfig::new(ProviderKind::OpenAi, " ", "sk-test");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProviderConfig::new(ProviderKind::OpenAi, "gpt-4o", "sk-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
