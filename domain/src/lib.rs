//! Domain layer for magi
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## The three personas
//!
//! Every question is answered independently by three fixed personas:
//!
//! - **MELCHIOR-1** (scientist): logic, data, probability
//! - **BALTHASAR-2** (mother): responsibility, ethics, long-term strategy
//! - **CASPER-3** (woman): intuition and emotion, holds the veto
//!
//! ## Collective decision
//!
//! Yes/no questions are put to a vote ([`decision::DecisionPolicy`]); open
//! questions only collect the three perspectives and resolve to `info`.

pub mod config;
pub mod core;
pub mod decision;
pub mod persona;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod util;
pub mod verdict;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, question::Question};
pub use decision::{
    ConsensusLevel, DecisionOutcome, DecisionPolicy, FinalDecision, QuestionMode, aggregate,
};
pub use persona::PersonaId;
pub use prompt::{PersonaPrompts, PromptTemplate};
pub use providers::{ProviderConfig, ProviderKind, resolve_endpoint};
pub use session::{ChatMessage, ChatRequest, Role};
pub use verdict::{ParsedReply, PersonaVerdict, VerdictStatus, parse_persona_reply};
