//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished decision is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every persona's answer followed by the collective decision
    #[default]
    Full,
    /// Only the collective verdict line
    Verdict,
    /// JSON document of the whole decision
    Json,
}
