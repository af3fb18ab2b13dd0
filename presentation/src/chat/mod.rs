//! Interactive chat module
//!
//! Provides a reedline-based interactive chat interface for MAGI.

mod repl;

pub use repl::{ChatInput, ChatRepl};
