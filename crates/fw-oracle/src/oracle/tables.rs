//! Meaning tables for random events and detail checks.
//!
//! Two d100 tables: an action word and a subject word. Together they form a
//! "meaning pair" the reader interprets, e.g. `Oppose Allies`.

use serde::{Deserialize, Serialize};

use fw_core::DiceSource;

/// Action words, indexed by `d100 - 1`.
pub const ACTION_WORDS: [&str; 100] = [
    "Attainment", "Starting", "Neglect", "Fight", "Recruit",
    "Triumph", "Violate", "Oppose", "Malice", "Communicate",
    "Persecute", "Increase", "Decrease", "Abandon", "Gratify",
    "Inquire", "Antagonize", "Move", "Waste", "Truce",
    "Release", "Befriend", "Judge", "Desert", "Dominate",
    "Procrastinate", "Praise", "Separate", "Take", "Break",
    "Heal", "Delay", "Stop", "Lie", "Return",
    "Imitate", "Struggle", "Inform", "Bestow", "Postpone",
    "Expose", "Haggle", "Imprison", "Release", "Celebrate",
    "Develop", "Travel", "Block", "Harm", "Debase",
    "Overindulge", "Adjourn", "Adversity", "Kill", "Disrupt",
    "Usurp", "Create", "Betray", "Agree", "Abuse",
    "Oppress", "Inspect", "Ambush", "Spy", "Attach",
    "Carry", "Open", "Carelessness", "Ruin", "Extravagance",
    "Trick", "Arrive", "Propose", "Divide", "Refuse",
    "Mistrust", "Deceive", "Cruelty", "Intolerance", "Trust",
    "Excitement", "Activity", "Assist", "Care", "Negligence",
    "Passion", "Work", "Control", "Attract", "Failure",
    "Pursue", "Vengeance", "Proceedings", "Dispute", "Punish",
    "Guide", "Transform", "Overthrow", "Oppress", "Change",
];

/// Subject words, indexed by `d100 - 1`.
pub const SUBJECT_WORDS: [&str; 100] = [
    "Goals", "Dreams", "Environment", "Outside", "Inside",
    "Reality", "Allies", "Enemies", "Evil", "Good",
    "Emotions", "Opposition", "War", "Peace", "Innocent",
    "Love", "Spirit", "Intellect", "Ideas", "Joy",
    "Evidence", "Burden", "Jealousy", "Dispute", "Home",
    "Investment", "Suffering", "Plans", "Lies", "Expectations",
    "Legal", "Bureaucracy", "Business", "Path", "News",
    "Exterior", "Advice", "Plot", "Competition", "Prison",
    "Illness", "Food", "Attention", "Success", "Failure",
    "Travel", "Jealousy", "Dispute", "Death", "Disruption",
    "Power", "Burden", "Intrigues", "Rumor", "Wounds",
    "Extravagance", "Representation", "Fame", "Anger", "Information",
    "Technology", "Weaponry", "Balance", "Mystical", "Military",
    "Riches", "Status", "Poverty", "Lies", "Vehicle",
    "Art", "Victory", "Dispute", "Elements", "Nature",
    "Animals", "Weather", "Masses", "Leadership", "Fears",
    "Danger", "Corruption", "Freedom", "Weapon", "Mundane",
    "Trial", "Energy", "Friendship", "Physical", "Benefits",
    "Tactics", "Allies", "Ambush", "Tension", "Direction",
    "Advantage", "Possessions", "Pain", "Wishes", "Tactics",
];

/// One roll on both meaning tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeaningRoll {
    /// Action word.
    pub action: String,
    /// Subject word.
    pub subject: String,
    /// Roll on the action table.
    pub action_roll: u32,
    /// Roll on the subject table.
    pub subject_roll: u32,
}

impl std::fmt::Display for MeaningRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.action, self.subject)
    }
}

/// Word lists used for meaning rolls.
///
/// Either list may be replaced by content; an empty list falls back to the
/// built-in table. Custom lists of any length are rolled with a die of that
/// many sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeaningTables {
    /// Custom action words.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    /// Custom subject words.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
}

impl MeaningTables {
    /// Roll one action word and one subject word, in that order.
    pub fn roll(&self, dice: &mut dyn DiceSource) -> MeaningRoll {
        let (action_roll, action) = pick(&self.actions, &ACTION_WORDS, dice);
        let (subject_roll, subject) = pick(&self.subjects, &SUBJECT_WORDS, dice);
        MeaningRoll {
            action,
            subject,
            action_roll,
            subject_roll,
        }
    }
}

fn pick(custom: &[String], builtin: &[&str], dice: &mut dyn DiceSource) -> (u32, String) {
    if custom.is_empty() {
        let roll = dice.roll_range(1, builtin.len() as u32);
        let word = builtin.get(roll as usize - 1).copied().unwrap_or_default();
        (roll, word.to_string())
    } else {
        let roll = dice.roll_range(1, u32::try_from(custom.len()).unwrap_or(u32::MAX));
        let word = custom.get(roll as usize - 1).cloned().unwrap_or_default();
        (roll, word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::{ScriptedDice, SeededDice};

    #[test]
    fn builtin_tables_are_one_based() {
        let mut dice = ScriptedDice::new(vec![1, 100]);
        let roll = MeaningTables::default().roll(&mut dice);
        assert_eq!(roll.action, ACTION_WORDS[0]);
        assert_eq!(roll.subject, SUBJECT_WORDS[99]);
        assert_eq!((roll.action_roll, roll.subject_roll), (1, 100));
        assert_eq!(dice.draws(), 2);
    }

    #[test]
    fn custom_lists_replace_builtins() {
        let tables = MeaningTables {
            actions: vec!["Burn".into(), "Bless".into()],
            subjects: Vec::new(),
        };
        let mut dice = ScriptedDice::new(vec![2, 3]);
        let roll = tables.roll(&mut dice);
        assert_eq!(roll.action, "Bless");
        assert_eq!(roll.subject, SUBJECT_WORDS[2]);
    }

    #[test]
    fn seeded_rolls_are_never_empty() {
        let mut dice = SeededDice::new(42);
        let tables = MeaningTables::default();
        for _ in 0..50 {
            let roll = tables.roll(&mut dice);
            assert!(!roll.action.is_empty());
            assert!(!roll.subject.is_empty());
        }
    }

    #[test]
    fn display_is_pair() {
        let roll = MeaningRoll {
            action: "Oppose".into(),
            subject: "Allies".into(),
            action_roll: 8,
            subject_roll: 90,
        };
        assert_eq!(roll.to_string(), "Oppose Allies");
    }
}
