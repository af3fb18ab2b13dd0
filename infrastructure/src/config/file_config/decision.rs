//! Decision configuration from TOML (`[decision]` section)

use magi_application::RetryPolicy;
use magi_domain::DecisionPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw decision configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDecisionConfig {
    /// "veto" (default) or "majority"
    pub policy: DecisionPolicy,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_factor: f64,
    pub request_timeout_secs: u64,
}

impl Default for FileDecisionConfig {
    fn default() -> Self {
        Self {
            policy: DecisionPolicy::default(),
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_factor: 2.0,
            request_timeout_secs: 30,
        }
    }
}

impl FileDecisionConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_retries(self.max_retries)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
            .with_backoff_factor(self.backoff_factor)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize() {
        let toml_str = r#"
policy = "majority"
max_retries = 5
request_timeout_secs = 10
"#;
        let config: FileDecisionConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.policy, DecisionPolicy::Majority);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_retry_policy_matches_defaults() {
        assert_eq!(FileDecisionConfig::default().retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_policy_alias() {
        let config: FileDecisionConfig = toml::from_str(r#"policy = "veto""#).unwrap();
        assert_eq!(config.policy, DecisionPolicy::VetoWithTieBreak);
    }
}
