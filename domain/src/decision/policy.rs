//! Decision policies
//!
//! Aggregation is a pure function over three already-normalized verdicts,
//! so it cannot fail: every combination resolves to some [`DecisionOutcome`].

use super::entities::{ConsensusLevel, DecisionOutcome, QuestionMode};
use crate::verdict::{PersonaVerdict, VerdictStatus};
use serde::{Deserialize, Serialize};

/// Rule for folding three verdicts into one
///
/// - `VetoWithTieBreak`: CASPER-3 can unilaterally reject; otherwise a 2-of-3
///   majority wins and a three-way split is broken by
///   `conditional > yes > info` (default)
/// - `Majority`: any status with two or more votes wins, otherwise `error`
///
/// # Example
///
/// ```
/// use magi_domain::DecisionPolicy;
///
/// let policy: DecisionPolicy = "majority".parse().unwrap();
/// assert_eq!(policy, DecisionPolicy::Majority);
/// assert_eq!(DecisionPolicy::default(), DecisionPolicy::VetoWithTieBreak);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPolicy {
    #[default]
    #[serde(alias = "veto")]
    VetoWithTieBreak,
    Majority,
}

impl DecisionPolicy {
    pub fn description(&self) -> &'static str {
        match self {
            DecisionPolicy::VetoWithTieBreak => "veto (CASPER-3 veto, majority, tie-break)",
            DecisionPolicy::Majority => "majority (two of three, otherwise error)",
        }
    }
}

impl std::fmt::Display for DecisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for DecisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "veto" | "veto_with_tie_break" | "veto-with-tie-break" => {
                Ok(DecisionPolicy::VetoWithTieBreak)
            }
            "majority" | "simple" => Ok(DecisionPolicy::Majority),
            other => Err(format!(
                "Unknown decision policy: {}. Valid: veto, majority",
                other
            )),
        }
    }
}

/// Aggregate the three persona verdicts into a decision outcome.
///
/// Verdicts must be in [`PersonaId::ALL`](crate::persona::PersonaId::ALL) order.
pub fn aggregate(
    verdicts: &[PersonaVerdict; 3],
    mode: QuestionMode,
    policy: DecisionPolicy,
) -> DecisionOutcome {
    if !mode.is_yes_no() {
        return outcome(
            VerdictStatus::Info,
            1.0,
            ConsensusLevel::Informational,
            "Open question: the three perspectives are presented without a vote.".to_string(),
        );
    }

    match policy {
        DecisionPolicy::VetoWithTieBreak => veto_with_tie_break(verdicts),
        DecisionPolicy::Majority => simple_majority(verdicts),
    }
}

fn veto_with_tie_break(verdicts: &[PersonaVerdict; 3]) -> DecisionOutcome {
    if let Some(veto) = verdicts
        .iter()
        .find(|v| v.persona_id.holds_veto() && v.status == VerdictStatus::No)
    {
        return outcome(
            VerdictStatus::No,
            1.0,
            ConsensusLevel::Unanimous,
            format!("{} exercised the veto.", veto.persona_id),
        );
    }

    if let Some(failed) = verdicts.iter().find(|v| v.is_error()) {
        return outcome(
            VerdictStatus::Error,
            0.0,
            ConsensusLevel::None,
            format!("{} could not produce a verdict.", failed.persona_id),
        );
    }

    if let Some(decided) = winning_majority(verdicts) {
        return decided;
    }

    // Three-way split
    let tally = Tally::of(verdicts);
    for (status, confidence) in [
        (VerdictStatus::Conditional, 0.5),
        (VerdictStatus::Yes, 0.5),
        (VerdictStatus::Info, 0.3),
    ] {
        if tally.count(status) > 0 {
            return outcome(
                status,
                confidence,
                ConsensusLevel::Split,
                format!("Votes are split three ways; tie-break selects {}.", status),
            );
        }
    }

    // Not reachable with three non-error verdicts and no veto
    outcome(
        VerdictStatus::Error,
        0.0,
        ConsensusLevel::None,
        "No consensus could be formed.".to_string(),
    )
}

fn simple_majority(verdicts: &[PersonaVerdict; 3]) -> DecisionOutcome {
    let errors = verdicts.iter().filter(|v| v.is_error()).count();
    if errors >= 2 {
        return outcome(
            VerdictStatus::Error,
            0.0,
            ConsensusLevel::None,
            format!("{} of 3 personas failed.", errors),
        );
    }

    if let Some(decided) = winning_majority(verdicts) {
        return decided;
    }

    if verdicts
        .iter()
        .any(|v| v.status == VerdictStatus::Conditional)
    {
        return outcome(
            VerdictStatus::Conditional,
            1.0 / 3.0,
            ConsensusLevel::Split,
            "No majority; a conditional position is on the table.".to_string(),
        );
    }

    outcome(
        VerdictStatus::Error,
        0.0,
        ConsensusLevel::None,
        "No majority could be formed.".to_string(),
    )
}

fn winning_majority(verdicts: &[PersonaVerdict; 3]) -> Option<DecisionOutcome> {
    let tally = Tally::of(verdicts);
    let (status, count) = tally.leader()?;
    if count < 2 {
        return None;
    }

    let (level, confidence) = if count == 3 {
        (ConsensusLevel::Unanimous, 1.0)
    } else {
        (ConsensusLevel::Majority, count as f64 / 3.0)
    };

    Some(outcome(
        status,
        confidence,
        level,
        format!("{} of 3 personas answered {}.", count, status),
    ))
}

/// Vote counts over the tallied statuses, in [`VerdictStatus::VOTING`] order
struct Tally([usize; 4]);

impl Tally {
    fn of(verdicts: &[PersonaVerdict; 3]) -> Self {
        let mut counts = [0; 4];
        for verdict in verdicts {
            if let Some(slot) = VerdictStatus::VOTING
                .iter()
                .position(|s| *s == verdict.status)
            {
                counts[slot] += 1;
            }
        }
        Self(counts)
    }

    fn count(&self, status: VerdictStatus) -> usize {
        VerdictStatus::VOTING
            .iter()
            .position(|s| *s == status)
            .map(|slot| self.0[slot])
            .unwrap_or(0)
    }

    /// Status with the highest count; the earliest in tally order wins ties
    fn leader(&self) -> Option<(VerdictStatus, usize)> {
        VerdictStatus::VOTING
            .iter()
            .zip(self.0)
            .filter(|(_, count)| *count > 0)
            .fold(None, |best: Option<(VerdictStatus, usize)>, (status, count)| {
                match best {
                    Some((_, best_count)) if best_count >= count => best,
                    _ => Some((*status, count)),
                }
            })
    }
}

fn outcome(
    result: VerdictStatus,
    confidence: f64,
    consensus_level: ConsensusLevel,
    reasoning: String,
) -> DecisionOutcome {
    DecisionOutcome {
        result,
        confidence,
        consensus_level,
        reasoning,
    }
}

/// Verdicts for the three personas with the given statuses
#[cfg(any(test, feature = "test-support"))]
pub fn verdicts_with(statuses: [VerdictStatus; 3]) -> [PersonaVerdict; 3] {
    let personas = crate::persona::PersonaId::ALL;
    [0, 1, 2].map(|i| PersonaVerdict {
        persona_id: personas[i],
        raw_text: String::new(),
        status: statuses[i],
        response: statuses[i].to_string(),
        conditions: Vec::new(),
        parse_error: None,
        received_at: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::VerdictStatus::{Conditional, Error, Info, No, Yes};

    const ALL_STATUSES: [VerdictStatus; 5] = [Yes, No, Conditional, Info, Error];

    fn veto(statuses: [VerdictStatus; 3]) -> DecisionOutcome {
        aggregate(
            &verdicts_with(statuses),
            QuestionMode::YesNo,
            DecisionPolicy::VetoWithTieBreak,
        )
    }

    fn every_triple() -> impl Iterator<Item = [VerdictStatus; 3]> {
        ALL_STATUSES.into_iter().flat_map(|a| {
            ALL_STATUSES
                .into_iter()
                .flat_map(move |b| ALL_STATUSES.into_iter().map(move |c| [a, b, c]))
        })
    }

    // ==================== Properties ====================

    #[test]
    fn test_casper_no_always_vetoes() {
        for triple in every_triple().filter(|t| t[2] == No) {
            let result = veto(triple);
            assert_eq!(result.result, No, "{triple:?}");
            assert_eq!(result.confidence, 1.0);
            assert_eq!(result.consensus_level, ConsensusLevel::Unanimous);
        }
    }

    #[test]
    fn test_majority_wins_without_veto_or_error() {
        for triple in every_triple() {
            if triple[2] == No || triple.contains(&Error) {
                continue;
            }
            for status in VerdictStatus::VOTING {
                let count = triple.iter().filter(|s| **s == status).count();
                if count >= 2 {
                    let result = veto(triple);
                    assert_eq!(result.result, status, "{triple:?}");
                    assert!((result.confidence - count as f64 / 3.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_split_priority() {
        for triple in every_triple() {
            let distinct = triple[0] != triple[1] && triple[1] != triple[2] && triple[0] != triple[2];
            if !distinct || triple[2] == No || triple.contains(&Error) {
                continue;
            }
            let expected = if triple.contains(&Conditional) {
                Conditional
            } else if triple.contains(&Yes) {
                Yes
            } else {
                Info
            };
            let result = veto(triple);
            assert_eq!(result.result, expected, "{triple:?}");
            assert_eq!(result.consensus_level, ConsensusLevel::Split);
        }
    }

    #[test]
    fn test_outcome_invariants_hold_everywhere() {
        for policy in [DecisionPolicy::VetoWithTieBreak, DecisionPolicy::Majority] {
            for triple in every_triple() {
                let result = aggregate(&verdicts_with(triple), QuestionMode::YesNo, policy);
                assert!((0.0..=1.0).contains(&result.confidence));
                if result.consensus_level == ConsensusLevel::Unanimous {
                    assert_eq!(result.confidence, 1.0);
                }
                assert!(!result.reasoning.is_empty());
            }
        }
    }

    // ==================== Scenarios ====================

    #[test]
    fn test_friday_deploy_majority() {
        let result = veto([Yes, Conditional, Yes]);
        assert_eq!(result.result, Yes);
        assert_eq!(result.consensus_level, ConsensusLevel::Majority);
        assert!((result.confidence - 0.667).abs() < 0.001);
    }

    #[test]
    fn test_friday_deploy_veto() {
        let result = veto([Yes, Yes, No]);
        assert_eq!(result.result, No);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.consensus_level, ConsensusLevel::Unanimous);
        assert!(result.reasoning.contains("CASPER-3"));
    }

    #[test]
    fn test_open_question_is_informational() {
        for triple in every_triple() {
            for policy in [DecisionPolicy::VetoWithTieBreak, DecisionPolicy::Majority] {
                let result = aggregate(&verdicts_with(triple), QuestionMode::Open, policy);
                assert_eq!(result.result, Info);
                assert_eq!(result.confidence, 1.0);
                assert_eq!(result.consensus_level, ConsensusLevel::Informational);
            }
        }
    }

    #[test]
    fn test_error_beats_majority() {
        let result = veto([Yes, Yes, Error]);
        assert_eq!(result.result, Error);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.consensus_level, ConsensusLevel::None);
    }

    #[test]
    fn test_melchior_no_is_not_a_veto() {
        let result = veto([No, Yes, Yes]);
        assert_eq!(result.result, Yes);
    }

    #[test]
    fn test_unanimous_yes() {
        let result = veto([Yes, Yes, Yes]);
        assert_eq!(result.result, Yes);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.consensus_level, ConsensusLevel::Unanimous);
    }

    #[test]
    fn test_split_without_conditional_picks_yes() {
        let result = veto([No, Info, Yes]);
        assert_eq!(result.result, Yes);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.consensus_level, ConsensusLevel::Split);
    }

    #[test]
    fn test_tally_leader_prefers_earliest_on_ties() {
        let tally = Tally::of(&verdicts_with([Info, No, Conditional]));
        assert_eq!(tally.count(Info), 1);
        assert_eq!(tally.count(Yes), 0);
        assert_eq!(tally.leader(), Some((No, 1)));
    }

    // ==================== Majority policy ====================

    fn majority(statuses: [VerdictStatus; 3]) -> DecisionOutcome {
        aggregate(
            &verdicts_with(statuses),
            QuestionMode::YesNo,
            DecisionPolicy::Majority,
        )
    }

    #[test]
    fn test_majority_policy_has_no_veto() {
        assert_eq!(majority([Yes, Yes, No]).result, Yes);
    }

    #[test]
    fn test_majority_policy_tolerates_one_error() {
        assert_eq!(majority([No, Error, No]).result, No);
        assert_eq!(majority([Error, Error, Yes]).result, Error);
        assert_eq!(majority([Error, Error, Error]).result, Error);
    }

    #[test]
    fn test_majority_policy_conditional_fallback() {
        assert_eq!(majority([Yes, No, Conditional]).result, Conditional);
        assert_eq!(majority([Yes, No, Info]).result, Error);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("veto".parse::<DecisionPolicy>().ok(), Some(DecisionPolicy::VetoWithTieBreak));
        assert_eq!("MAJORITY".parse::<DecisionPolicy>().ok(), Some(DecisionPolicy::Majority));
        assert!("unanimity".parse::<DecisionPolicy>().is_err());
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_string(&DecisionPolicy::VetoWithTieBreak).unwrap();
        assert_eq!(json, "\"veto_with_tie_break\"");
        let policy: DecisionPolicy = serde_json::from_str("\"veto\"").unwrap();
        assert_eq!(policy, DecisionPolicy::VetoWithTieBreak);
    }
}
