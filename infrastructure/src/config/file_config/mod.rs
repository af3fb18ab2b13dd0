//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod decision;
mod history;
mod logging;
mod output;
mod prompts;
mod provider;

pub use decision::FileDecisionConfig;
pub use history::FileHistoryConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use prompts::FilePromptsConfig;
pub use provider::FileProviderConfig;

use magi_application::DecisionParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("decision.request_timeout_secs cannot be 0")]
    InvalidTimeout,

    #[error("decision.backoff_factor must be at least 1.0")]
    InvalidBackoffFactor,

    #[error("history.max_records cannot be 0")]
    InvalidMaxRecords,

    #[error("provider.model cannot be empty")]
    EmptyModelName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub provider: FileProviderConfig,
    pub decision: FileDecisionConfig,
    pub prompts: FilePromptsConfig,
    pub history: FileHistoryConfig,
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.decision.request_timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.decision.backoff_factor.is_nan() || self.decision.backoff_factor < 1.0 {
            return Err(ConfigValidationError::InvalidBackoffFactor);
        }
        if self.history.max_records == 0 {
            return Err(ConfigValidationError::InvalidMaxRecords);
        }
        if self.provider.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }
        Ok(())
    }

    /// Use case parameters from `[decision]` and `[prompts]`
    pub fn decision_params(&self) -> DecisionParams {
        DecisionParams::default()
            .with_policy(self.decision.policy)
            .with_prompts(self.prompts.to_prompts())
            .with_retry(self.decision.retry_policy())
            .with_request_timeout(self.decision.request_timeout())
    }
}
