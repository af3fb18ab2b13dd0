//! The three MAGI personas
//!
//! Persona identity is fixed: every decision carries exactly one verdict per
//! persona, always in [`PersonaId::ALL`] order.

use serde::{Deserialize, Serialize};

/// Identity of one of the three personas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    /// MELCHIOR-1, the scientist
    Melchior,
    /// BALTHASAR-2, the mother
    Balthasar,
    /// CASPER-3, the woman; holds the veto
    Casper,
}

impl PersonaId {
    /// All personas in their canonical order
    pub const ALL: [PersonaId; 3] = [PersonaId::Melchior, PersonaId::Balthasar, PersonaId::Casper];

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaId::Melchior => "melchior",
            PersonaId::Balthasar => "balthasar",
            PersonaId::Casper => "casper",
        }
    }

    /// Display name as shown on the MAGI panels (e.g. "MELCHIOR-1")
    pub fn display_name(&self) -> &'static str {
        match self {
            PersonaId::Melchior => "MELCHIOR-1",
            PersonaId::Balthasar => "BALTHASAR-2",
            PersonaId::Casper => "CASPER-3",
        }
    }

    /// The facet of personality this persona embodies
    pub fn role(&self) -> &'static str {
        match self {
            PersonaId::Melchior => "scientist",
            PersonaId::Balthasar => "mother",
            PersonaId::Casper => "woman",
        }
    }

    /// Position in [`PersonaId::ALL`]
    pub fn index(&self) -> usize {
        match self {
            PersonaId::Melchior => 0,
            PersonaId::Balthasar => 1,
            PersonaId::Casper => 2,
        }
    }

    /// Whether a `no` from this persona overrides the vote
    pub fn holds_veto(&self) -> bool {
        matches!(self, PersonaId::Casper)
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for PersonaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "melchior" | "melchior-1" => Ok(PersonaId::Melchior),
            "balthasar" | "balthasar-2" => Ok(PersonaId::Balthasar),
            "casper" | "casper-3" => Ok(PersonaId::Casper),
            other => Err(format!(
                "Unknown persona: {}. Valid: melchior, balthasar, casper",
                other
            )),
        }
    }
}
