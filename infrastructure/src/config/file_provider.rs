//! File-backed [`ConfigProvider`]
//!
//! Reloads the configuration files on every cycle so edits take effect on the
//! next question without restarting. Command-line overrides are applied on
//! top of whatever the files say.

use super::file_config::FileConfig;
use super::loader::ConfigLoader;
use magi_application::ConfigProvider;
use magi_domain::{DomainError, ProviderConfig, ProviderKind};
use std::path::PathBuf;
use tracing::debug;

/// Values given on the command line that win over every file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOverrides {
    pub provider: Option<ProviderKind>,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

impl ProviderOverrides {
    pub fn apply(&self, mut config: ProviderConfig) -> ProviderConfig {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(api_base) = &self.api_base {
            config.api_base_override = Some(api_base.clone());
        }
        config
    }
}

pub struct FileConfigProvider {
    config_path: Option<PathBuf>,
    /// Skip every file and use built-in defaults (--no-config)
    defaults_only: bool,
    overrides: ProviderOverrides,
}

impl FileConfigProvider {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            defaults_only: false,
            overrides: ProviderOverrides::default(),
        }
    }

    pub fn defaults_only() -> Self {
        Self {
            config_path: None,
            defaults_only: true,
            overrides: ProviderOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: ProviderOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    fn load(&self) -> Result<FileConfig, DomainError> {
        if self.defaults_only {
            return Ok(ConfigLoader::load_defaults());
        }
        ConfigLoader::load(self.config_path.as_ref())
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))
    }
}

impl ConfigProvider for FileConfigProvider {
    fn provider_config(&self) -> Result<ProviderConfig, DomainError> {
        let file = self.load()?;
        file.validate()
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))?;

        let config = self.overrides.apply(file.provider.to_provider_config());
        debug!(?config, "Loaded provider configuration");
        Ok(config)
    }
}
