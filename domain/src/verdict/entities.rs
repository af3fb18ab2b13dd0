//! Persona verdict entity

use super::parsing::{ParsedReply, parse_persona_reply};
use super::status::VerdictStatus;
use crate::persona::PersonaId;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// One persona's normalized reply to a question (Entity)
///
/// Never mutated after creation. A verdict carrying a `parse_error` is
/// always `info` or `error`; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaVerdict {
    pub persona_id: PersonaId,
    /// Reply text exactly as the provider returned it (or the diagnostic on failure)
    pub raw_text: String,
    pub status: VerdictStatus,
    /// Text to show the user
    pub response: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    /// Milliseconds since the Unix epoch
    pub received_at: u64,
}

impl PersonaVerdict {
    /// Parse a raw reply into a verdict.
    pub fn from_reply(persona_id: PersonaId, raw_text: impl Into<String>, is_yes_no: bool) -> Self {
        let raw_text = raw_text.into();
        let parsed = parse_persona_reply(&raw_text, is_yes_no);
        Self::from_parsed(persona_id, raw_text, parsed)
    }

    /// Build a verdict from an already-parsed reply.
    pub fn from_parsed(persona_id: PersonaId, raw_text: String, parsed: ParsedReply) -> Self {
        let status = if parsed.parse_error.is_some() && parsed.status.is_decisive() {
            VerdictStatus::Info
        } else {
            parsed.status
        };

        Self {
            persona_id,
            raw_text,
            status,
            response: parsed.response,
            conditions: parsed.conditions,
            parse_error: parsed.parse_error,
            received_at: current_timestamp(),
        }
    }

    /// An `error` verdict for a persona whose call failed outright.
    pub fn failure(persona_id: PersonaId, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            persona_id,
            raw_text: message.clone(),
            status: VerdictStatus::Error,
            response: message,
            conditions: Vec::new(),
            parse_error: None,
            received_at: current_timestamp(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == VerdictStatus::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reply_yes_no() {
        let verdict = PersonaVerdict::from_reply(
            PersonaId::Melchior,
            r#"{"answer":"Go.","classification":{"status":"yes","conditions":[]}}"#,
            true,
        );
        assert_eq!(verdict.persona_id, PersonaId::Melchior);
        assert_eq!(verdict.status, VerdictStatus::Yes);
        assert_eq!(verdict.response, "Go.");
        assert!(verdict.raw_text.contains("classification"));
        assert!(verdict.received_at > 0);
    }

    #[test]
    fn test_parse_error_is_never_decisive() {
        let parsed = ParsedReply {
            status: VerdictStatus::Yes,
            response: "forced".to_string(),
            conditions: vec![],
            parse_error: Some("broken".to_string()),
        };
        let verdict = PersonaVerdict::from_parsed(PersonaId::Casper, "raw".to_string(), parsed);
        assert_eq!(verdict.status, VerdictStatus::Info);
    }

    #[test]
    fn test_failure() {
        let verdict = PersonaVerdict::failure(PersonaId::Balthasar, "Fetch Error: connection reset");
        assert!(verdict.is_error());
        assert_eq!(verdict.response, "Fetch Error: connection reset");
        assert!(verdict.parse_error.is_none());
    }

    #[test]
    fn test_serde_camel_case() {
        let verdict = PersonaVerdict::failure(PersonaId::Casper, "x");
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["personaId"], "casper");
        assert_eq!(json["status"], "error");
        assert!(json.get("parseError").is_none());
    }
}
