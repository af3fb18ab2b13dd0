//! Visual mapping for verdict statuses.
//!
//! The domain's [`VerdictStatus`] is a pure decision value; how each status
//! looks on a terminal is decided here and nowhere else.

use colored::{Color, ColoredString, Colorize};
use magi_domain::VerdictStatus;

/// How one status is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub color: Color,
    pub icon: &'static str,
    pub label: &'static str,
}

pub fn status_style(status: VerdictStatus) -> StatusStyle {
    match status {
        VerdictStatus::Yes => StatusStyle {
            color: Color::Green,
            icon: "✔",
            label: "APPROVED",
        },
        VerdictStatus::No => StatusStyle {
            color: Color::Red,
            icon: "✘",
            label: "DENIED",
        },
        VerdictStatus::Conditional => StatusStyle {
            color: Color::Yellow,
            icon: "◐",
            label: "CONDITIONAL",
        },
        VerdictStatus::Info => StatusStyle {
            color: Color::Cyan,
            icon: "ℹ",
            label: "INFO",
        },
        VerdictStatus::Error => StatusStyle {
            color: Color::Magenta,
            icon: "⚠",
            label: "ERROR",
        },
    }
}

/// `✔ APPROVED`, colored
pub fn badge(status: VerdictStatus) -> ColoredString {
    let style = status_style(status);
    format!("{} {}", style.icon, style.label)
        .color(style.color)
        .bold()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [VerdictStatus; 5] = [
        VerdictStatus::Yes,
        VerdictStatus::No,
        VerdictStatus::Conditional,
        VerdictStatus::Info,
        VerdictStatus::Error,
    ];

    #[test]
    fn test_every_status_is_distinct() {
        for (i, a) in ALL.iter().enumerate() {
            for b in &ALL[i + 1..] {
                let (sa, sb) = (status_style(*a), status_style(*b));
                assert_ne!(sa.color, sb.color);
                assert_ne!(sa.icon, sb.icon);
                assert_ne!(sa.label, sb.label);
            }
        }
    }

    #[test]
    fn test_badge_text() {
        colored::control::set_override(false);
        assert_eq!(badge(VerdictStatus::No).to_string(), "✘ DENIED");
        assert_eq!(badge(VerdictStatus::Yes).to_string(), "✔ APPROVED");
    }
}
