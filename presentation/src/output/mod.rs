//! Output formatting for decisions, history and health reports

pub mod console;
pub mod formatter;
pub mod style;
