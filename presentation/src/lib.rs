//! Presentation layer for magi
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, Command, HistoryAction, OutputFormat, PolicyArg};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use output::style::{StatusStyle, badge, status_style};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
