//! Console output formatter for MAGI decisions

use crate::output::formatter::OutputFormatter;
use crate::output::style::{badge, status_style};
use colored::Colorize;
use magi_application::{HistoryStats, ServiceHealth};
use magi_domain::util::preview;
use magi_domain::{FinalDecision, PersonaVerdict, QuestionMode, VerdictStatus};

const WIDTH: usize = 60;

/// Formats MAGI decisions for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete decision
    pub fn format(decision: &FinalDecision) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("MAGI SYSTEM"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            decision.question
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Mode:".cyan().bold(),
            decision.question_mode
        ));

        output.push_str(&Self::section_header("Deliberation"));
        for verdict in &decision.verdicts {
            output.push_str(&Self::verdict_block(verdict, decision.question_mode));
        }

        output.push_str(&Self::section_header("Decision"));
        output.push('\n');
        output.push_str(&Self::verdict_line(decision));
        output.push('\n');
        if !decision.reasoning.is_empty() {
            output.push_str(&format!("{}\n", decision.reasoning));
        }
        output.push_str(&format!(
            "{}\n",
            format!(
                "Processed in {} ms  [{}]",
                decision.processing_time_ms, decision.question_id
            )
            .dimmed()
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(decision: &FinalDecision) -> String {
        serde_json::to_string_pretty(decision).unwrap_or_else(|_| "{}".to_string())
    }

    /// The verdict line and reasoning; open questions also list the three answers
    pub fn format_verdict_only(decision: &FinalDecision) -> String {
        let mut output = Self::verdict_line(decision);
        output.push('\n');

        if decision.question_mode == QuestionMode::Open {
            for verdict in &decision.verdicts {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    verdict.persona_id.display_name().yellow().bold(),
                    Self::indent(&verdict.response, "  ")
                ));
            }
        } else if !decision.reasoning.is_empty() {
            output.push_str(&format!("{}\n", decision.reasoning));
        }

        output
    }

    /// One line per stored decision, newest first
    pub fn format_history_list(decisions: &[FinalDecision]) -> String {
        if decisions.is_empty() {
            return format!("{}\n", "No decisions recorded yet.".dimmed());
        }

        decisions
            .iter()
            .map(|d| {
                format!(
                    "{}  {}  {:<16}  {}\n",
                    d.question_id.dimmed(),
                    Self::timestamp(d.decided_at),
                    badge(d.result).to_string(),
                    preview(&d.question, 50)
                )
            })
            .collect()
    }

    pub fn format_stats(stats: &HistoryStats) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {}\n",
            "Decisions:".cyan().bold(),
            stats.total_records
        ));
        output.push_str(&format!(
            "{} {:.0} ms\n",
            "Average response time:".cyan().bold(),
            stats.average_response_time_ms
        ));
        output.push_str(&format!("{}\n", "Results:".cyan().bold()));
        for status in [
            VerdictStatus::Yes,
            VerdictStatus::No,
            VerdictStatus::Conditional,
            VerdictStatus::Info,
            VerdictStatus::Error,
        ] {
            output.push_str(&format!(
                "  {:<16} {}\n",
                badge(status).to_string(),
                stats.decision_distribution.get(status)
            ));
        }
        output
    }

    pub fn format_health(health: &ServiceHealth) -> String {
        if health.available {
            return format!("{}\n", "✔ Provider is reachable".green().bold());
        }

        let mut output = format!("{}\n", "✘ Provider is unavailable".red().bold());
        if let Some(error) = &health.error {
            output.push_str(&format!("  {}\n", error));
        }
        if let Some(suggestion) = &health.suggestion {
            output.push_str(&format!("  {} {}\n", "Hint:".yellow().bold(), suggestion));
        }
        output
    }

    fn verdict_block(verdict: &PersonaVerdict, mode: QuestionMode) -> String {
        let title = format!(
            "── {} ({}) ──",
            verdict.persona_id.display_name(),
            verdict.persona_id.role()
        );
        let style = status_style(verdict.status);

        let mut block = if mode.is_yes_no() || verdict.is_error() {
            format!(
                "\n{}  {}\n",
                title.color(style.color).bold(),
                badge(verdict.status)
            )
        } else {
            format!("\n{}\n", title.color(style.color).bold())
        };

        block.push_str(&verdict.response);
        block.push('\n');

        if !verdict.conditions.is_empty() {
            block.push_str(&format!("{}\n", "  Conditions:".yellow()));
            for condition in &verdict.conditions {
                block.push_str(&format!("    * {}\n", condition));
            }
        }
        if let Some(note) = &verdict.parse_error {
            block.push_str(&format!("{}\n", format!("  (reply not understood: {})", note).dimmed()));
        }
        block
    }

    fn verdict_line(decision: &FinalDecision) -> String {
        format!(
            "{}  {}  {}",
            badge(decision.result),
            format!("confidence {}%", Self::percent(decision.confidence)).bold(),
            format!("consensus {}", decision.consensus_level).dimmed()
        )
    }

    fn percent(confidence: f64) -> u32 {
        (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    fn timestamp(ms: u64) -> String {
        chrono::DateTime::from_timestamp_millis(ms as i64)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| "-".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(WIDTH);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(WIDTH).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, decision: &FinalDecision) -> String {
        Self::format(decision)
    }

    fn format_json(&self, decision: &FinalDecision) -> String {
        Self::format_json(decision)
    }

    fn format_verdict_only(&self, decision: &FinalDecision) -> String {
        Self::format_verdict_only(decision)
    }
}
