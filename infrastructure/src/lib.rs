//! Infrastructure layer for magi
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP chat-completion gateway,
//! configuration file loading, the JSON history store and the
//! JSONL transcript logger.

pub mod config;
pub mod gateway;
pub mod history;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConfigProvider, ProviderOverrides,
};
pub use gateway::HttpLlmGateway;
pub use history::JsonHistoryStore;
pub use logging::JsonlConversationLogger;
