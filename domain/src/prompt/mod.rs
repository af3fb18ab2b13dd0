//! Prompts sent to the classifier and the three personas.

pub mod template;

pub use template::{PersonaPrompts, PromptTemplate};
