//! Decision history port

use magi_domain::{FinalDecision, VerdictStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a history store
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History data is invalid: {0}")]
    Format(String),

    #[error("No history record with id {0}")]
    NotFound(String),
}

/// Count of decisions per result status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDistribution {
    pub yes: usize,
    pub no: usize,
    pub conditional: usize,
    pub info: usize,
    pub error: usize,
}

impl DecisionDistribution {
    pub fn record(&mut self, status: VerdictStatus) {
        match status {
            VerdictStatus::Yes => self.yes += 1,
            VerdictStatus::No => self.no += 1,
            VerdictStatus::Conditional => self.conditional += 1,
            VerdictStatus::Info => self.info += 1,
            VerdictStatus::Error => self.error += 1,
        }
    }

    pub fn get(&self, status: VerdictStatus) -> usize {
        match status {
            VerdictStatus::Yes => self.yes,
            VerdictStatus::No => self.no,
            VerdictStatus::Conditional => self.conditional,
            VerdictStatus::Info => self.info,
            VerdictStatus::Error => self.error,
        }
    }
}

/// Aggregate figures over the stored history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_records: usize,
    pub average_response_time_ms: f64,
    pub decision_distribution: DecisionDistribution,
}

impl HistoryStats {
    pub fn from_decisions<'a>(decisions: impl IntoIterator<Item = &'a FinalDecision>) -> Self {
        let mut stats = Self::default();
        let mut total_time = 0u64;
        for decision in decisions {
            stats.total_records += 1;
            total_time += decision.processing_time_ms;
            stats.decision_distribution.record(decision.result);
        }
        if stats.total_records > 0 {
            stats.average_response_time_ms = total_time as f64 / stats.total_records as f64;
        }
        stats
    }
}

/// Persistent store of past decisions, newest first
pub trait HistoryRepository: Send + Sync {
    /// Store a decision, evicting the oldest beyond capacity
    fn add(&self, decision: &FinalDecision) -> Result<(), HistoryError>;

    /// Most recent decisions, newest first
    fn list(&self, limit: Option<usize>) -> Result<Vec<FinalDecision>, HistoryError>;

    fn get(&self, question_id: &str) -> Result<Option<FinalDecision>, HistoryError>;

    /// Case-insensitive match on the question or any persona response
    fn search(&self, query: &str) -> Result<Vec<FinalDecision>, HistoryError>;

    /// Decisions with `from <= decided_at <= to` (milliseconds since the epoch)
    fn between(&self, from: u64, to: u64) -> Result<Vec<FinalDecision>, HistoryError>;

    fn delete(&self, question_id: &str) -> Result<(), HistoryError>;

    fn clear(&self) -> Result<(), HistoryError>;

    fn stats(&self) -> Result<HistoryStats, HistoryError>;

    /// Whole history as a JSON document
    fn export(&self) -> Result<String, HistoryError>;

    /// Merge records from a JSON document; returns how many were added
    fn import(&self, json: &str) -> Result<usize, HistoryError>;
}
