//! Progress notification port
//!
//! Defines the interface for reporting progress while MAGI deliberates.

use magi_domain::{FinalDecision, PersonaId, PersonaVerdict, QuestionMode};

/// Callback for progress updates during a decision
///
/// Implementations live in the presentation layer. Persona callbacks arrive
/// in completion order, which is not persona order.
pub trait DecisionProgressNotifier: Send + Sync {
    /// Called once the question has been classified
    fn on_classified(&self, mode: QuestionMode);

    /// Called when a persona call is dispatched
    fn on_persona_start(&self, persona: PersonaId);

    /// Called as soon as a persona's verdict is available
    fn on_persona_complete(&self, verdict: &PersonaVerdict);

    /// Called when the collective decision is ready
    fn on_decision(&self, _decision: &FinalDecision) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DecisionProgressNotifier for NoProgress {
    fn on_classified(&self, _mode: QuestionMode) {}
    fn on_persona_start(&self, _persona: PersonaId) {}
    fn on_persona_complete(&self, _verdict: &PersonaVerdict) {}
}
