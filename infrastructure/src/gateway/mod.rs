//! LLM gateway adapters

pub mod http;
pub mod protocol;

pub use http::HttpLlmGateway;
