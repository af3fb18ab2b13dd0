//! Decision parameters: use case control.
//!
//! Static parameters for [`AskMagiUseCase`](crate::use_cases::ask_magi::AskMagiUseCase).
//! Prompts and policy are domain concepts; retries and timeouts are
//! application concerns.

use crate::retry::RetryPolicy;
use magi_domain::{DecisionPolicy, PersonaPrompts};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DecisionParams {
    pub policy: DecisionPolicy,
    pub prompts: PersonaPrompts,
    pub retry: RetryPolicy,
    /// Upper bound for a single provider request, retries excluded
    pub request_timeout: Duration,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            policy: DecisionPolicy::default(),
            prompts: PersonaPrompts::default(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl DecisionParams {
    // ==================== Builder Methods ====================

    pub fn with_policy(mut self, policy: DecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_prompts(mut self, prompts: PersonaPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = DecisionParams::default();
        assert_eq!(params.policy, DecisionPolicy::VetoWithTieBreak);
        assert_eq!(params.retry.max_retries, 3);
        assert_eq!(params.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let params = DecisionParams::default()
            .with_policy(DecisionPolicy::Majority)
            .with_retry(RetryPolicy::none())
            .with_request_timeout(Duration::from_secs(5));
        assert_eq!(params.policy, DecisionPolicy::Majority);
        assert_eq!(params.retry.max_retries, 0);
        assert_eq!(params.request_timeout, Duration::from_secs(5));
    }
}
