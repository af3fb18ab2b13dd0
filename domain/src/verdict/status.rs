//! Verdict status value object

use serde::{Deserialize, Serialize};

/// Normalized outcome of a single persona, and of the collective decision
///
/// Pure business discriminant; colors and labels live in the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Yes,
    No,
    Conditional,
    /// Informational answer (open question, or an unparseable-but-usable reply)
    Info,
    Error,
}

impl VerdictStatus {
    /// Statuses that take part in a vote tally, in tally order
    pub const VOTING: [VerdictStatus; 4] = [
        VerdictStatus::Yes,
        VerdictStatus::No,
        VerdictStatus::Conditional,
        VerdictStatus::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Yes => "yes",
            VerdictStatus::No => "no",
            VerdictStatus::Conditional => "conditional",
            VerdictStatus::Info => "info",
            VerdictStatus::Error => "error",
        }
    }

    /// Interpret a status label produced by a model.
    ///
    /// Case and surrounding whitespace are ignored. Anything outside the five
    /// known labels (e.g. the template placeholder "yes/no/conditional")
    /// returns `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "yes" => Some(VerdictStatus::Yes),
            "no" => Some(VerdictStatus::No),
            "conditional" => Some(VerdictStatus::Conditional),
            "info" => Some(VerdictStatus::Info),
            "error" => Some(VerdictStatus::Error),
            _ => None,
        }
    }

    /// Whether this is a definite yes/no/conditional position
    pub fn is_decisive(&self) -> bool {
        matches!(
            self,
            VerdictStatus::Yes | VerdictStatus::No | VerdictStatus::Conditional
        )
    }
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        assert_eq!(VerdictStatus::from_label("yes"), Some(VerdictStatus::Yes));
        assert_eq!(VerdictStatus::from_label(" NO "), Some(VerdictStatus::No));
        assert_eq!(
            VerdictStatus::from_label("Conditional"),
            Some(VerdictStatus::Conditional)
        );
        assert_eq!(VerdictStatus::from_label("yes/no/conditional"), None);
        assert_eq!(VerdictStatus::from_label(""), None);
    }

    #[test]
    fn test_is_decisive() {
        assert!(VerdictStatus::Yes.is_decisive());
        assert!(VerdictStatus::Conditional.is_decisive());
        assert!(!VerdictStatus::Info.is_decisive());
        assert!(!VerdictStatus::Error.is_decisive());
    }

    #[test]
    fn test_serde_roundtrip_lowercase() {
        let json = serde_json::to_string(&VerdictStatus::Conditional).unwrap();
        assert_eq!(json, "\"conditional\"");
        let status: VerdictStatus = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(status, VerdictStatus::Info);
    }
}
