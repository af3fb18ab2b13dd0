//! Persona verdicts
//!
//! A verdict is the normalized result of one persona's reply: a
//! [`VerdictStatus`], the answer text, and any conditions attached to it.
//!
//! Replies to yes/no questions are expected to carry a small JSON document.
//! Models rarely produce it cleanly, so [`parse_persona_reply`] decodes in
//! escalating stages and degrades to `info` or `error` rather than guessing.

pub mod entities;
pub mod parsing;
pub mod status;

pub use entities::PersonaVerdict;
pub use parsing::{ParsedReply, parse_persona_reply};
pub use status::VerdictStatus;
