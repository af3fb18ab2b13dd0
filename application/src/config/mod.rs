//! Application-level configuration.
//!
//! - [`DecisionParams`]: how a decision cycle runs (policy, retries, timeouts)

pub mod decision_params;

pub use decision_params::DecisionParams;
