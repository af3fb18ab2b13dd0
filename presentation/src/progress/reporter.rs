//! Progress reporting while MAGI deliberates

use crate::output::style::badge;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use magi_application::DecisionProgressNotifier;
use magi_domain::{FinalDecision, PersonaId, PersonaVerdict, QuestionMode};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// One spinner per persona, resolved to its verdict badge as replies arrive
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<PersonaId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn mode_message(mode: QuestionMode) -> String {
        match mode {
            QuestionMode::YesNo => "yes/no question, put to a vote".to_string(),
            QuestionMode::Open => "open question, collecting perspectives".to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionProgressNotifier for ProgressReporter {
    fn on_classified(&self, mode: QuestionMode) {
        let _ = self
            .multi
            .println(format!("{} {}", "->".cyan(), Self::mode_message(mode)));
    }

    fn on_persona_start(&self, persona: PersonaId) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("{:<12}", persona.display_name()));
        pb.set_message("deliberating...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(persona, pb);
        }
    }

    fn on_persona_complete(&self, verdict: &PersonaVerdict) {
        let Ok(mut bars) = self.bars.lock() else {
            return;
        };
        if let Some(pb) = bars.remove(&verdict.persona_id) {
            pb.finish_with_message(badge(verdict.status).to_string());
        }
    }

    fn on_decision(&self, _decision: &FinalDecision) {
        if let Ok(mut bars) = self.bars.lock() {
            for (_, pb) in bars.drain() {
                pb.finish_and_clear();
            }
        }
        let _ = self.multi.clear();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SimpleProgress {
    fn completion_line(verdict: &PersonaVerdict) -> String {
        format!(
            "  {} {}",
            badge(verdict.status),
            verdict.persona_id.display_name()
        )
    }
}

impl DecisionProgressNotifier for SimpleProgress {
    fn on_classified(&self, mode: QuestionMode) {
        println!(
            "{} {}",
            "->".cyan(),
            ProgressReporter::mode_message(mode).bold()
        );
    }

    fn on_persona_start(&self, _persona: PersonaId) {}

    fn on_persona_complete(&self, verdict: &PersonaVerdict) {
        println!("{}", Self::completion_line(verdict));
    }

    fn on_decision(&self, _decision: &FinalDecision) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_domain::VerdictStatus;

    fn hidden() -> ProgressReporter {
        ProgressReporter::with_target(ProgressDrawTarget::hidden())
    }

    #[test]
    fn test_spinner_per_persona() {
        let reporter = hidden();
        for persona in PersonaId::ALL {
            reporter.on_persona_start(persona);
        }
        let bars = reporter.bars.lock().unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[&PersonaId::Casper].message(), "deliberating...");
    }

    #[test]
    fn test_completion_finishes_with_badge() {
        colored::control::set_override(false);
        let reporter = hidden();
        reporter.on_persona_start(PersonaId::Balthasar);

        let pb = reporter.bars.lock().unwrap()[&PersonaId::Balthasar].clone();
        reporter.on_persona_complete(&PersonaVerdict::failure(PersonaId::Balthasar, "boom"));

        assert!(pb.is_finished());
        assert_eq!(pb.message(), "⚠ ERROR");
        assert!(reporter.bars.lock().unwrap().is_empty());
    }

    #[test]
    fn test_completion_for_unknown_persona_is_ignored() {
        let reporter = hidden();
        reporter.on_persona_complete(&PersonaVerdict::failure(PersonaId::Melchior, "late"));
        assert!(reporter.bars.lock().unwrap().is_empty());
    }

    #[test]
    fn test_simple_completion_line() {
        colored::control::set_override(false);
        let mut verdict = PersonaVerdict::failure(PersonaId::Casper, "x");
        verdict.status = VerdictStatus::No;
        assert_eq!(SimpleProgress::completion_line(&verdict), "  ✘ DENIED CASPER-3");
    }
}
