//! Question value object

use super::error::DomainError;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-process submission counter; keeps ids unique within one millisecond
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A question submitted to MAGI (Value Object)
///
/// Immutable once created. The id ties the three persona verdicts and the
/// final decision back to this submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: String,
    query: String,
    /// Milliseconds since the Unix epoch
    submitted_at: u64,
}

impl Question {
    /// Create a new question stamped with the current time.
    ///
    /// Ids have the form `question-{millis}-{seq}`. Fails if the query is
    /// empty or only whitespace.
    pub fn new(query: impl Into<String>) -> Result<Self, DomainError> {
        let submitted_at = current_timestamp();
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self::with_id(
            format!("question-{}-{}", submitted_at, seq),
            query,
            submitted_at,
        )
    }

    /// Create a question with an explicit identity (history import, tests).
    pub fn with_id(
        id: impl Into<String>,
        query: impl Into<String>,
        submitted_at: u64,
    ) -> Result<Self, DomainError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(DomainError::InvalidQuestion(
                "question cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            id: id.into(),
            query,
            submitted_at,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The question text as the user typed it
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn submitted_at(&self) -> u64 {
        self.submitted_at
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query)
    }
}
