//! Persona reply parsing.
//!
//! Extracts a structured verdict from a free-form persona reply. Pure domain
//! logic: no I/O, no hidden state, so the same input always yields the same
//! result.
//!
//! For yes/no questions the reply should contain:
//!
//! ```json
//! {"answer": "...", "classification": {"status": "yes", "conditions": []}}
//! ```
//!
//! optionally wrapped in Markdown code fences. Decoding escalates through
//! three stages, each tried only when the previous one failed:
//!
//! | Stage | Strategy |
//! |-------|----------|
//! | 1 | Strict JSON parse of the fence-stripped text |
//! | 2 | Repair pass (quote runs, bare keys, backslash runs), then parse again |
//! | 3 | Regex salvage of the `answer` and `status` fields only |
//!
//! None of the stages invent a position: a status is only ever taken from an
//! explicit `status` field. Unusable replies degrade to `info` or `error`.

use super::status::VerdictStatus;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Parse error recorded when no stage could decode the reply
pub const INVALID_JSON: &str = "Invalid JSON format";

/// Parse error recorded when decoding worked but `answer` or `status` is missing
pub const INCOMPLETE_JSON: &str = "Incomplete JSON structure";

/// Parse error recorded when `status` is not one of the known labels
pub const UNKNOWN_STATUS: &str = "Unrecognized verdict status";

static QUOTE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""+"#).unwrap());

static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([{,]\s*)([A-Za-z0-9_]+)(\s*:)").unwrap());

static BACKSLASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\\+([^"\\])"#).unwrap());

static ANSWER_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""answer"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap());

static STATUS_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""status"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap());

/// Verdict fields extracted from one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub status: VerdictStatus,
    /// Text shown to the user: the `answer` field, or the raw reply on failure
    pub response: String,
    pub conditions: Vec<String>,
    pub parse_error: Option<String>,
}

impl ParsedReply {
    fn info(response: &str) -> Self {
        Self {
            status: VerdictStatus::Info,
            response: response.to_string(),
            conditions: Vec::new(),
            parse_error: None,
        }
    }

    fn degraded(status: VerdictStatus, response: &str, parse_error: &str) -> Self {
        Self {
            status,
            response: response.to_string(),
            conditions: Vec::new(),
            parse_error: Some(parse_error.to_string()),
        }
    }
}

/// Fields pulled out of a decoded reply before validation
#[derive(Debug, Default)]
struct Candidate {
    answer: Option<String>,
    status: Option<String>,
    conditions: Vec<String>,
}

/// Parse one persona reply.
///
/// Open questions (`is_yes_no == false`) are never parsed: the raw text is
/// the answer and the status is always `info`.
///
/// # Examples
///
/// ```
/// use magi_domain::verdict::{VerdictStatus, parse_persona_reply};
///
/// let reply = r#"{"answer":"x","classification":{"status":"yes","conditions":[]}}"#;
/// let parsed = parse_persona_reply(reply, true);
/// assert_eq!(parsed.status, VerdictStatus::Yes);
/// assert_eq!(parsed.response, "x");
///
/// let parsed = parse_persona_reply("Mars is cold.", false);
/// assert_eq!(parsed.status, VerdictStatus::Info);
/// assert_eq!(parsed.response, "Mars is cold.");
/// ```
pub fn parse_persona_reply(raw_text: &str, is_yes_no: bool) -> ParsedReply {
    if !is_yes_no {
        return ParsedReply::info(raw_text);
    }

    let body = strip_code_fences(raw_text);

    match decode(body) {
        Some(candidate) => validate(candidate, raw_text),
        None => ParsedReply::degraded(VerdictStatus::Error, raw_text, INVALID_JSON),
    }
}

/// Remove a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };

    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Repair common JSON defects produced by models.
///
/// - runs of consecutive quotes collapse to one (`""status""` → `"status"`)
/// - bare object keys get quoted (`{answer: ...` → `{"answer": ...`)
/// - runs of backslashes before an ordinary character collapse to one
pub fn repair_json(text: &str) -> String {
    let collapsed = QUOTE_RUN.replace_all(text, "\"");
    let keyed = BARE_KEY.replace_all(&collapsed, "${1}\"${2}\"${3}");
    BACKSLASH_RUN.replace_all(&keyed, "\\${1}").into_owned()
}

fn decode(body: &str) -> Option<Candidate> {
    // Stage 1: strict
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return Some(candidate_from_value(&value));
    }

    // Stage 2: repaired, then the outermost object inside any surrounding prose
    let repaired = repair_json(body);
    if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
        return Some(candidate_from_value(&value));
    }
    if let Some(object) = outermost_object(&repaired)
        && let Ok(value) = serde_json::from_str::<Value>(object)
    {
        return Some(candidate_from_value(&value));
    }

    // Stage 3: salvage
    salvage(body)
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn candidate_from_value(value: &Value) -> Candidate {
    let answer = value
        .get("answer")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let status = value
        .pointer("/classification/status")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let conditions = value
        .pointer("/classification/conditions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    Candidate {
        answer,
        status,
        conditions,
    }
}

/// Extract `answer` and `status` independently, ignoring all other structure.
fn salvage(body: &str) -> Option<Candidate> {
    let answer = ANSWER_FIELD
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| unescape(m.as_str()))
        .filter(|s| !s.is_empty())?;

    let status = STATUS_FIELD
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| unescape(m.as_str()))?;

    Some(Candidate {
        answer: Some(answer),
        status: Some(status),
        conditions: Vec::new(),
    })
}

fn unescape(text: &str) -> String {
    text.replace("\\\"", "\"").replace("\\n", "\n")
}

fn validate(candidate: Candidate, raw_text: &str) -> ParsedReply {
    let (Some(answer), Some(label)) = (candidate.answer, candidate.status) else {
        return ParsedReply::degraded(VerdictStatus::Info, raw_text, INCOMPLETE_JSON);
    };

    match VerdictStatus::from_label(&label) {
        Some(status) => ParsedReply {
            status,
            response: answer,
            conditions: candidate.conditions,
            parse_error: None,
        },
        None => ParsedReply::degraded(VerdictStatus::Info, &answer, UNKNOWN_STATUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Open questions ====================

    #[test]
    fn test_open_question_is_verbatim_info() {
        let raw = "1. Surface temperature averages -63C\n2. Dust storms";
        let parsed = parse_persona_reply(raw, false);
        assert_eq!(parsed.status, VerdictStatus::Info);
        assert_eq!(parsed.response, raw);
        assert!(parsed.conditions.is_empty());
        assert!(parsed.parse_error.is_none());
    }

    #[test]
    fn test_open_question_ignores_json() {
        let raw = r#"{"answer":"x","classification":{"status":"no"}}"#;
        let parsed = parse_persona_reply(raw, false);
        assert_eq!(parsed.status, VerdictStatus::Info);
        assert_eq!(parsed.response, raw);
    }

    // ==================== Stage 1: strict ====================

    #[test]
    fn test_well_formed_reply() {
        let raw = r#"{"answer":"x","classification":{"status":"yes","conditions":[]}}"#;
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(
            parsed,
            ParsedReply {
                status: VerdictStatus::Yes,
                response: "x".to_string(),
                conditions: vec![],
                parse_error: None,
            }
        );
    }

    #[test]
    fn test_json_fence() {
        let raw = "```json\n{\"answer\": \"Probability of success is 12%.\", \"classification\": {\"status\": \"no\"}}\n```";
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::No);
        assert_eq!(parsed.response, "Probability of success is 12%.");
        assert!(parsed.conditions.is_empty());
    }

    #[test]
    fn test_plain_fence_with_conditions() {
        let raw = "```\n{\"answer\": \"Only with a rollback plan.\", \"classification\": {\"status\": \"conditional\", \"conditions\": [\"rollback plan\", \"on-call staff\"]}}\n```";
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Conditional);
        assert_eq!(parsed.conditions, vec!["rollback plan", "on-call staff"]);
    }

    #[test]
    fn test_missing_conditions_defaults_to_empty() {
        let raw = r#"{"answer":"fine","classification":{"status":"yes"}}"#;
        let parsed = parse_persona_reply(raw, true);
        assert!(parsed.conditions.is_empty());
    }

    // ==================== Stage 2: repair ====================

    #[test]
    fn test_repair_doubled_quotes() {
        let raw = r#"{""answer"": ""Risk is acceptable."", ""classification"": {""status"": ""yes""}}"#;
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Yes);
        assert_eq!(parsed.response, "Risk is acceptable.");
    }

    #[test]
    fn test_repair_bare_keys() {
        let raw = r#"{answer: "Our duty is to protect the pilots.", classification: {status: "no", conditions: []}}"#;
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::No);
        assert_eq!(parsed.response, "Our duty is to protect the pilots.");
    }

    #[test]
    fn test_repair_json_rules() {
        assert_eq!(repair_json(r#"{""a"": 1}"#), r#"{"a": 1}"#);
        assert_eq!(repair_json("{a: 1, b_2 : 2}"), r#"{"a": 1, "b_2" : 2}"#);
        assert_eq!(repair_json(r"\\\x"), r"\x");
    }

    #[test]
    fn test_object_inside_prose() {
        let raw = "Here is my verdict:\n{\"answer\": \"Yes.\", \"classification\": {\"status\": \"yes\"}}\nThank you.";
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Yes);
        assert_eq!(parsed.response, "Yes.");
    }

    // ==================== Stage 3: salvage ====================

    #[test]
    fn test_salvage_truncated_reply() {
        let raw = r#"{"answer": "The \"plan\" is risky", "classification": {"status": "conditional", "conditions": ["backup"#;
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Conditional);
        assert_eq!(parsed.response, "The \"plan\" is risky");
        assert!(parsed.conditions.is_empty());
        assert!(parsed.parse_error.is_none());
    }

    #[test]
    fn test_salvage_requires_both_fields() {
        let raw = r#"{"answer": "I feel uneasy", "classification": {"#;
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Error);
        assert_eq!(parsed.parse_error.as_deref(), Some(INVALID_JSON));
    }

    // ==================== Degradation ====================

    #[test]
    fn test_unparseable_reply_is_error_with_raw_text() {
        let raw = "I think the answer is yes, definitely.";
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Error);
        assert_eq!(parsed.response, raw);
        assert_eq!(parsed.parse_error.as_deref(), Some(INVALID_JSON));
    }

    #[test]
    fn test_incomplete_structure_is_info() {
        let raw = r#"{"answer":"Logically sound."}"#;
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Info);
        assert_eq!(parsed.response, raw);
        assert_eq!(parsed.parse_error.as_deref(), Some(INCOMPLETE_JSON));
    }

    #[test]
    fn test_non_object_json_is_incomplete() {
        let parsed = parse_persona_reply("\"yes\"", true);
        assert_eq!(parsed.status, VerdictStatus::Info);
        assert_eq!(parsed.parse_error.as_deref(), Some(INCOMPLETE_JSON));
    }

    #[test]
    fn test_unknown_status_is_never_promoted() {
        let raw = r#"{"answer":"Perhaps.","classification":{"status":"yes/no/conditional"}}"#;
        let parsed = parse_persona_reply(raw, true);
        assert_eq!(parsed.status, VerdictStatus::Info);
        assert_eq!(parsed.response, "Perhaps.");
        assert_eq!(parsed.parse_error.as_deref(), Some(UNKNOWN_STATUS));
    }

    #[test]
    fn test_parse_error_implies_info_or_error() {
        let samples = [
            "yes",
            "no",
            "{}",
            r#"{"classification":{"status":"yes"}}"#,
            r#"{"answer":"","classification":{"status":"no"}}"#,
            r#"{"answer":"a","classification":{"status":"maybe"}}"#,
            "```json\n{broken```",
        ];
        for raw in samples {
            let parsed = parse_persona_reply(raw, true);
            if parsed.parse_error.is_some() {
                assert!(
                    matches!(parsed.status, VerdictStatus::Info | VerdictStatus::Error),
                    "{raw:?} produced {:?}",
                    parsed.status
                );
            }
        }
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let raw = r#"{answer: "half-broken", "classification": {"status": "no""#;
        let first = parse_persona_reply(raw, true);
        let second = parse_persona_reply(raw, true);
        assert_eq!(first, second);
    }

    // ==================== Fences ====================

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```JSON\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
        assert_eq!(strip_code_fences("```json\n{}"), "{}");
    }
}
