//! File-backed decision history.
//!
//! The whole history lives in one JSON document:
//!
//! ```json
//! { "version": "1.0.0", "records": [ ... ], "lastUpdated": "2024-05-01T12:00:00.000Z" }
//! ```
//!
//! Records are kept newest first and capped at `max_records`. Records that
//! fail to decode or are structurally unsound are dropped on load.

use chrono::{SecondsFormat, Utc};
use magi_application::{HistoryError, HistoryRepository, HistoryStats};
use magi_domain::FinalDecision;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDocument<R> {
    version: String,
    records: Vec<R>,
    #[serde(default)]
    last_updated: Option<String>,
}

/// Accepted import shapes: a full document or a bare array of records
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Document(HistoryDocument<Value>),
    Records(Vec<Value>),
}

/// JSON history store with an in-memory copy written through on every change
pub struct JsonHistoryStore {
    path: PathBuf,
    max_records: usize,
    records: Mutex<Vec<FinalDecision>>,
}

impl JsonHistoryStore {
    /// Open the store at `path`. A missing file is an empty history; an
    /// unreadable one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>, max_records: usize) -> Result<Self, HistoryError> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HistoryDocument<Value>>(&text) {
                Ok(document) => decode_records(document.records),
                Err(e) => {
                    warn!("History file {} is not valid, starting empty: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(HistoryError::Io(e)),
        };

        let mut records = records;
        sort_newest_first(&mut records);
        records.truncate(max_records.max(1));
        debug!(path = %path.display(), records = records.len(), "History loaded");

        Ok(Self {
            path,
            max_records: max_records.max(1),
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<FinalDecision>>, HistoryError> {
        self.records
            .lock()
            .map_err(|_| HistoryError::Format("history lock poisoned".to_string()))
    }

    fn document(records: &[FinalDecision]) -> HistoryDocument<&FinalDecision> {
        HistoryDocument {
            version: FORMAT_VERSION.to_string(),
            records: records.iter().collect(),
            last_updated: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }

    fn persist(&self, records: &[FinalDecision]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&Self::document(records))
            .map_err(|e| HistoryError::Format(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(HistoryError::Io(e));
        }
        Ok(())
    }

    /// Apply `change` to a copy of the records; the copy replaces the
    /// in-memory state only once it is on disk.
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut Vec<FinalDecision>) -> Result<T, HistoryError>,
    ) -> Result<T, HistoryError> {
        let mut records = self.lock()?;
        let mut next = records.clone();
        let outcome = change(&mut next)?;
        self.persist(&next)?;
        *records = next;
        Ok(outcome)
    }
}

fn decode_records(values: Vec<Value>) -> Vec<FinalDecision> {
    let total = values.len();
    let records: Vec<FinalDecision> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value::<FinalDecision>(value).ok())
        .filter(FinalDecision::is_well_formed)
        .collect();

    if records.len() < total {
        warn!(dropped = total - records.len(), "Dropped malformed history records");
    }
    records
}

fn sort_newest_first(records: &mut [FinalDecision]) {
    records.sort_by(|a, b| b.decided_at.cmp(&a.decided_at));
}

fn matches_query(decision: &FinalDecision, needle: &str) -> bool {
    decision.question.to_lowercase().contains(needle)
        || decision
            .verdicts
            .iter()
            .any(|v| v.response.to_lowercase().contains(needle))
}

impl HistoryRepository for JsonHistoryStore {
    fn add(&self, decision: &FinalDecision) -> Result<(), HistoryError> {
        self.commit(|records| {
            records.retain(|r| r.question_id != decision.question_id);
            records.insert(0, decision.clone());
            records.truncate(self.max_records);
            Ok(())
        })
    }

    fn list(&self, limit: Option<usize>) -> Result<Vec<FinalDecision>, HistoryError> {
        let records = self.lock()?;
        let limit = limit.unwrap_or(records.len());
        Ok(records.iter().take(limit).cloned().collect())
    }

    fn get(&self, question_id: &str) -> Result<Option<FinalDecision>, HistoryError> {
        let records = self.lock()?;
        Ok(records.iter().find(|r| r.question_id == question_id).cloned())
    }

    fn search(&self, query: &str) -> Result<Vec<FinalDecision>, HistoryError> {
        let needle = query.trim().to_lowercase();
        let records = self.lock()?;
        if needle.is_empty() {
            return Ok(records.clone());
        }
        Ok(records
            .iter()
            .filter(|r| matches_query(r, &needle))
            .cloned()
            .collect())
    }

    fn between(&self, from: u64, to: u64) -> Result<Vec<FinalDecision>, HistoryError> {
        let records = self.lock()?;
        Ok(records
            .iter()
            .filter(|r| (from..=to).contains(&r.decided_at))
            .cloned()
            .collect())
    }

    fn delete(&self, question_id: &str) -> Result<(), HistoryError> {
        self.commit(|records| {
            let before = records.len();
            records.retain(|r| r.question_id != question_id);
            if records.len() == before {
                return Err(HistoryError::NotFound(question_id.to_string()));
            }
            Ok(())
        })
    }

    fn clear(&self) -> Result<(), HistoryError> {
        self.commit(|records| {
            records.clear();
            Ok(())
        })
    }

    fn stats(&self) -> Result<HistoryStats, HistoryError> {
        let records = self.lock()?;
        Ok(HistoryStats::from_decisions(records.iter()))
    }

    fn export(&self) -> Result<String, HistoryError> {
        let records = self.lock()?;
        serde_json::to_string_pretty(&Self::document(&records))
            .map_err(|e| HistoryError::Format(e.to_string()))
    }

    fn import(&self, json: &str) -> Result<usize, HistoryError> {
        let payload: ImportPayload = serde_json::from_str(json)
            .map_err(|e| HistoryError::Format(format!("not a history document: {}", e)))?;
        let values = match payload {
            ImportPayload::Document(document) => document.records,
            ImportPayload::Records(records) => records,
        };

        let incoming = decode_records(values);
        let added = self.commit(|records| {
            let mut added = 0;
            for decision in incoming {
                if records.iter().any(|r| r.question_id == decision.question_id) {
                    continue;
                }
                records.push(decision);
                added += 1;
            }
            sort_newest_first(records);
            records.truncate(self.max_records);
            Ok(added)
        })?;
        debug!(added, "History imported");
        Ok(added)
    }
}
