//! Fate chart for yes/no questions.
//!
//! The chart maps a likelihood and the current chaos factor to a d100
//! threshold. Rolling at or under the threshold is a yes; the outer fifth of
//! each side is exceptional. Doubles at or under the chaos factor also
//! trigger a random event.

use serde::{Deserialize, Serialize};

use fw_core::DiceSource;

use super::event::{RandomEvent, generate_random_event};
use super::tables::MeaningTables;
use crate::error::{OracleError, OracleResult};

/// How likely a "yes" answer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Likelihood {
    /// Almost certainly not.
    Impossible,
    /// Extremely unlikely.
    NoWay,
    /// Very unlikely.
    VeryUnlikely,
    /// Somewhat unlikely.
    Unlikely,
    /// Even odds.
    FiftyFifty,
    /// Somewhat likely.
    SomewhatLikely,
    /// Probably.
    Likely,
    /// Very likely.
    VeryLikely,
    /// Almost certain.
    NearSureThing,
    /// Virtually guaranteed.
    ASureThing,
    /// Cannot fail.
    HasToBe,
}

impl Likelihood {
    const ALL: [Self; 11] = [
        Self::Impossible,
        Self::NoWay,
        Self::VeryUnlikely,
        Self::Unlikely,
        Self::FiftyFifty,
        Self::SomewhatLikely,
        Self::Likely,
        Self::VeryLikely,
        Self::NearSureThing,
        Self::ASureThing,
        Self::HasToBe,
    ];

    /// Parse a likelihood from user input (`likely`, `50/50`, `very-unlikely`, ...).
    pub fn parse(s: &str) -> OracleResult<Self> {
        match s.to_lowercase().replace(['-', '_'], " ").trim() {
            "impossible" => Ok(Self::Impossible),
            "no way" | "noway" => Ok(Self::NoWay),
            "very unlikely" => Ok(Self::VeryUnlikely),
            "unlikely" => Ok(Self::Unlikely),
            "50/50" | "5050" | "fifty fifty" | "even" => Ok(Self::FiftyFifty),
            "somewhat likely" => Ok(Self::SomewhatLikely),
            "likely" => Ok(Self::Likely),
            "very likely" => Ok(Self::VeryLikely),
            "near sure thing" | "near sure" => Ok(Self::NearSureThing),
            "a sure thing" | "sure thing" | "sure" => Ok(Self::ASureThing),
            "has to be" | "certain" => Ok(Self::HasToBe),
            _ => Err(OracleError::InvalidLikelihood(s.to_string())),
        }
    }

    /// All values from least to most likely.
    pub fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Impossible => "Impossible",
            Self::NoWay => "No Way",
            Self::VeryUnlikely => "Very Unlikely",
            Self::Unlikely => "Unlikely",
            Self::FiftyFifty => "50/50",
            Self::SomewhatLikely => "Somewhat Likely",
            Self::Likely => "Likely",
            Self::VeryLikely => "Very Likely",
            Self::NearSureThing => "Near Sure Thing",
            Self::ASureThing => "A Sure Thing",
            Self::HasToBe => "Has To Be",
        };
        f.write_str(label)
    }
}

/// The answer to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FateAnswer {
    /// Yes, beyond what was expected.
    ExceptionalYes,
    /// Yes.
    Yes,
    /// No.
    No,
    /// No, and worse than expected.
    ExceptionalNo,
}

impl FateAnswer {
    /// Affirmative, including the exceptional variant.
    pub fn is_yes(self) -> bool {
        matches!(self, Self::Yes | Self::ExceptionalYes)
    }

    /// Either exceptional variant.
    pub fn is_exceptional(self) -> bool {
        matches!(self, Self::ExceptionalYes | Self::ExceptionalNo)
    }
}

impl std::fmt::Display for FateAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExceptionalYes => write!(f, "Exceptional Yes"),
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
            Self::ExceptionalNo => write!(f, "Exceptional No"),
        }
    }
}

/// Full result of a fate check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FateCheck {
    /// The answer.
    pub answer: FateAnswer,
    /// The d100 roll.
    pub roll: u32,
    /// Threshold for a yes.
    pub target: u32,
    /// Random event triggered by the roll, when requested.
    pub random_event: Option<RandomEvent>,
}

/// `FATE_CHART[likelihood][chaos - 1]`: the highest d100 roll that is a yes.
const FATE_CHART: [[u32; 9]; 11] = [
    // chaos:  1   2   3   4   5   6   7   8   9
    [1, 2, 3, 5, 5, 5, 7, 10, 15],
    [2, 3, 5, 5, 5, 10, 15, 20, 25],
    [3, 5, 7, 10, 15, 20, 25, 35, 45],
    [5, 10, 15, 20, 25, 35, 45, 50, 55],
    [10, 15, 25, 35, 50, 55, 65, 75, 85],
    [15, 25, 35, 45, 55, 65, 75, 85, 90],
    [20, 35, 45, 55, 65, 75, 85, 90, 95],
    [30, 45, 55, 65, 75, 85, 90, 95, 97],
    [40, 55, 65, 75, 85, 90, 95, 97, 99],
    [50, 65, 75, 85, 90, 95, 97, 99, 99],
    [55, 75, 85, 90, 95, 97, 99, 99, 99],
];

/// The yes threshold for a likelihood at a chaos factor (clamped to 1-9).
pub fn fate_threshold(likelihood: Likelihood, chaos: u32) -> u32 {
    let chaos_idx = (chaos.clamp(1, 9) - 1) as usize;
    FATE_CHART[likelihood.index()][chaos_idx]
}

/// Whether a roll is a double (11, 22, ... 99) whose digit is at most `chaos`.
pub fn is_random_event_trigger(roll: u32, chaos: u32) -> bool {
    if !(11..=99).contains(&roll) {
        return false;
    }
    let tens = roll / 10;
    tens == roll % 10 && tens <= chaos
}

/// Classify a d100 roll against a threshold.
pub fn answer_for(roll: u32, target: u32) -> FateAnswer {
    let exceptional_yes = (target / 5).max(1);
    let exceptional_no = (target + (100 - target.min(100)) * 4 / 5).min(100);
    if roll <= target {
        if roll <= exceptional_yes {
            FateAnswer::ExceptionalYes
        } else {
            FateAnswer::Yes
        }
    } else if roll >= exceptional_no {
        FateAnswer::ExceptionalNo
    } else {
        FateAnswer::No
    }
}

/// Ask the fate chart a question. One d100 draw, plus three more when
/// `check_for_event` is set and the roll triggers a random event.
pub fn consult(
    likelihood: Likelihood,
    chaos: u32,
    dice: &mut dyn DiceSource,
    tables: &MeaningTables,
    check_for_event: bool,
) -> FateCheck {
    let target = fate_threshold(likelihood, chaos);
    let roll = dice.d100();
    let random_event = (check_for_event && is_random_event_trigger(roll, chaos))
        .then(|| generate_random_event(dice, tables));
    FateCheck {
        answer: answer_for(roll, target),
        roll,
        target,
        random_event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::{ScriptedDice, SeededDice};

    #[test]
    fn threshold_monotonic_in_chaos_and_likelihood() {
        for lk in Likelihood::all() {
            let mut prev = 0;
            for chaos in 1..=9 {
                let t = fate_threshold(*lk, chaos);
                assert!(t >= prev, "{lk} chaos {chaos}: {t} < {prev}");
                prev = t;
            }
        }
        for chaos in 1..=9 {
            let mut prev = 0;
            for lk in Likelihood::all() {
                let t = fate_threshold(*lk, chaos);
                assert!(t >= prev);
                prev = t;
            }
        }
    }

    #[test]
    fn doubles_trigger_events_up_to_chaos() {
        assert!(is_random_event_trigger(11, 1));
        assert!(is_random_event_trigger(55, 5));
        assert!(!is_random_event_trigger(66, 5));
        assert!(!is_random_event_trigger(12, 9));
        assert!(!is_random_event_trigger(100, 9));
        assert!(!is_random_event_trigger(5, 9));
    }

    #[test]
    fn answer_bands() {
        // 50/50 at chaos 5 has target 50: exceptional yes <= 10, exceptional no >= 90.
        assert_eq!(answer_for(1, 50), FateAnswer::ExceptionalYes);
        assert_eq!(answer_for(10, 50), FateAnswer::ExceptionalYes);
        assert_eq!(answer_for(11, 50), FateAnswer::Yes);
        assert_eq!(answer_for(50, 50), FateAnswer::Yes);
        assert_eq!(answer_for(51, 50), FateAnswer::No);
        assert_eq!(answer_for(89, 50), FateAnswer::No);
        assert_eq!(answer_for(90, 50), FateAnswer::ExceptionalNo);
    }

    #[test]
    fn low_target_still_has_exceptional_yes() {
        assert_eq!(answer_for(1, 1), FateAnswer::ExceptionalYes);
        assert_eq!(answer_for(2, 1), FateAnswer::No);
    }

    #[test]
    fn consult_uses_one_draw_without_event() {
        let mut dice = ScriptedDice::new(vec![30]);
        let check = consult(
            Likelihood::FiftyFifty,
            5,
            &mut dice,
            &MeaningTables::default(),
            true,
        );
        assert_eq!(check.answer, FateAnswer::Yes);
        assert_eq!(check.target, 50);
        assert!(check.random_event.is_none());
        assert_eq!(dice.draws(), 1);
    }

    #[test]
    fn consult_chains_event_on_doubles() {
        let mut dice = ScriptedDice::new(vec![33, 10, 1, 1]);
        let tables = MeaningTables::default();
        let check = consult(Likelihood::FiftyFifty, 5, &mut dice, &tables, true);
        assert!(check.random_event.is_some());
        assert_eq!(dice.draws(), 4);

        let mut dice = ScriptedDice::new(vec![33]);
        let check = consult(Likelihood::FiftyFifty, 5, &mut dice, &tables, false);
        assert!(check.random_event.is_none());
        assert_eq!(dice.draws(), 1);
    }

    #[test]
    fn consult_is_deterministic() {
        let tables = MeaningTables::default();
        let mut a = SeededDice::new(42);
        let mut b = SeededDice::new(42);
        for lk in Likelihood::all() {
            let ra = consult(*lk, 5, &mut a, &tables, true);
            let rb = consult(*lk, 5, &mut b, &tables, true);
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn likelihood_parse_and_display() {
        assert_eq!(Likelihood::parse("likely").unwrap(), Likelihood::Likely);
        assert_eq!(Likelihood::parse("50/50").unwrap(), Likelihood::FiftyFifty);
        assert_eq!(
            Likelihood::parse("very-likely").unwrap(),
            Likelihood::VeryLikely
        );
        assert!(Likelihood::parse("gibberish").is_err());
        assert_eq!(Likelihood::FiftyFifty.to_string(), "50/50");
        assert_eq!(Likelihood::HasToBe.to_string(), "Has To Be");
    }

    #[test]
    fn answer_predicates_and_serde() {
        assert!(FateAnswer::ExceptionalYes.is_yes());
        assert!(!FateAnswer::ExceptionalNo.is_yes());
        assert!(FateAnswer::ExceptionalNo.is_exceptional());
        assert!(!FateAnswer::Yes.is_exceptional());
        assert_eq!(
            serde_json::to_string(&FateAnswer::ExceptionalYes).unwrap(),
            "\"exceptional_yes\""
        );
    }
}
