//! Chat request domain.
//!
//! - [`entities::ChatMessage`]: a single message sent to a provider
//! - [`entities::ChatRequest`]: the OpenAI-compatible request body

pub mod entities;

pub use entities::{ChatMessage, ChatRequest, Role};
