//! Decision entities

use crate::core::question::Question;
use crate::util::current_timestamp;
use crate::verdict::{PersonaVerdict, VerdictStatus};
use serde::{Deserialize, Serialize};

/// Whether the question calls for a vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionMode {
    /// Answerable with yes / no / conditional; the personas vote
    YesNo,
    /// Open-ended; the personas only give their perspectives
    Open,
}

impl QuestionMode {
    pub fn from_classification(is_yes_no: bool) -> Self {
        if is_yes_no {
            QuestionMode::YesNo
        } else {
            QuestionMode::Open
        }
    }

    pub fn is_yes_no(&self) -> bool {
        matches!(self, QuestionMode::YesNo)
    }

    /// Label used in the persona user message ("Question type: ...")
    pub fn label(&self) -> &'static str {
        match self {
            QuestionMode::YesNo => "yes/no",
            QuestionMode::Open => "open",
        }
    }
}

impl std::fmt::Display for QuestionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How much the three verdicts agreed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusLevel {
    Unanimous,
    Majority,
    Split,
    /// No consensus could be formed (an error verdict, or nothing to tally)
    None,
    /// Open question; nothing was voted on
    Informational,
}

impl ConsensusLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusLevel::Unanimous => "unanimous",
            ConsensusLevel::Majority => "majority",
            ConsensusLevel::Split => "split",
            ConsensusLevel::None => "none",
            ConsensusLevel::Informational => "informational",
        }
    }
}

impl std::fmt::Display for ConsensusLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of aggregating three verdicts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutcome {
    pub result: VerdictStatus,
    /// In `[0, 1]`; exactly `1.0` whenever the level is unanimous
    pub confidence: f64,
    pub consensus_level: ConsensusLevel,
    pub reasoning: String,
}

/// The collective MAGI decision for one question (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDecision {
    pub question_id: String,
    pub question: String,
    pub question_mode: QuestionMode,
    /// One verdict per persona, in `PersonaId::ALL` order
    pub verdicts: [PersonaVerdict; 3],
    pub result: VerdictStatus,
    pub confidence: f64,
    pub consensus_level: ConsensusLevel,
    pub reasoning: String,
    pub processing_time_ms: u64,
    /// Milliseconds since the Unix epoch
    pub decided_at: u64,
}

impl FinalDecision {
    pub fn new(
        question: &Question,
        question_mode: QuestionMode,
        verdicts: [PersonaVerdict; 3],
        outcome: DecisionOutcome,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            question_id: question.id().to_string(),
            question: question.query().to_string(),
            question_mode,
            verdicts,
            result: outcome.result,
            confidence: outcome.confidence,
            consensus_level: outcome.consensus_level,
            reasoning: outcome.reasoning,
            processing_time_ms,
            decided_at: current_timestamp(),
        }
    }

    /// Answer id in the form `{question_id}-{persona display name}`
    pub fn answer_id(&self, index: usize) -> Option<String> {
        self.verdicts
            .get(index)
            .map(|v| format!("{}-{}", self.question_id, v.persona_id.display_name()))
    }

    /// Whether the record is structurally sound (used when loading history)
    pub fn is_well_formed(&self) -> bool {
        !self.question_id.is_empty()
            && !self.question.trim().is_empty()
            && (0.0..=1.0).contains(&self.confidence)
            && self
                .verdicts
                .iter()
                .zip(crate::persona::PersonaId::ALL)
                .all(|(v, p)| v.persona_id == p)
    }
}
