//! Application layer for magi
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod error;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use config::DecisionParams;
pub use error::{ApiErrorCode, ErrorKind, MagiError};
pub use ports::{
    config_provider::{ConfigProvider, StaticConfigProvider},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    history::{DecisionDistribution, HistoryError, HistoryRepository, HistoryStats},
    llm_gateway::{GatewayError, LlmGateway},
    progress::{DecisionProgressNotifier, NoProgress},
};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use use_cases::ask_magi::{AskMagiUseCase, ServiceHealth};
