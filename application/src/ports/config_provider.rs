//! Configuration provider port
//!
//! The use case asks for provider settings once per decision cycle instead of
//! holding them, so edits to the configuration apply to the next question.

use magi_domain::{DomainError, ProviderConfig};

/// Source of the provider settings for the current cycle
pub trait ConfigProvider: Send + Sync {
    fn provider_config(&self) -> Result<ProviderConfig, DomainError>;
}

/// Fixed settings (CLI overrides, tests)
#[derive(Debug, Clone)]
pub struct StaticConfigProvider {
    config: ProviderConfig,
}

impl StaticConfigProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn provider_config(&self) -> Result<ProviderConfig, DomainError> {
        Ok(self.config.clone())
    }
}
