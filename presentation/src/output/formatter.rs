//! Output formatter trait

use magi_domain::{FinalDecision, OutputFormat};

/// Trait for formatting MAGI decisions
pub trait OutputFormatter {
    /// Every persona's answer and the collective decision
    fn format(&self, decision: &FinalDecision) -> String;

    /// Format as JSON
    fn format_json(&self, decision: &FinalDecision) -> String;

    /// Only the collective verdict (concise output)
    fn format_verdict_only(&self, decision: &FinalDecision) -> String;

    fn render(&self, decision: &FinalDecision, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(decision),
            OutputFormat::Verdict => self.format_verdict_only(decision),
            OutputFormat::Json => self.format_json(decision),
        }
    }
}
