//! Configuration file loading for magi
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `MAGI_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./magi.toml` or `./.magi.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/magi/config.toml`
//! 5. Default values

mod file_config;
mod file_provider;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDecisionConfig, FileHistoryConfig, FileLoggingConfig,
    FileOutputConfig, FilePromptsConfig, FileProviderConfig,
};
pub use file_provider::{FileConfigProvider, ProviderOverrides};
pub use loader::ConfigLoader;
