//! Port definitions (interfaces for external dependencies)
//!
//! Ports define the boundary between the application and the outside world.
//! Adapters in the infrastructure and presentation layers implement them.

pub mod config_provider;
pub mod conversation_logger;
pub mod history;
pub mod llm_gateway;
pub mod progress;
