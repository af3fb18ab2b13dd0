//! Collective decision
//!
//! [`aggregate`] folds the three persona verdicts into a single
//! [`DecisionOutcome`] according to a [`DecisionPolicy`]; [`FinalDecision`]
//! is the record handed to history and presentation.

pub mod entities;
pub mod policy;

pub use entities::{ConsensusLevel, DecisionOutcome, FinalDecision, QuestionMode};
pub use policy::{DecisionPolicy, aggregate};
