//! LLM Gateway port
//!
//! Defines the interface for sending chat requests to LLM providers.

use async_trait::async_trait;
use magi_domain::{ChatRequest, ProviderConfig};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The provider answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The request never got a response (DNS, connect, reset)
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    /// 2xx response whose body is not a chat completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to chat-completion
/// providers. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send one chat request and return the first choice's message content
    async fn complete(
        &self,
        config: &ProviderConfig,
        request: &ChatRequest,
    ) -> Result<String, GatewayError>;
}
