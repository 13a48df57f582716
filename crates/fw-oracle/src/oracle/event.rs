//! Random event generation.
//!
//! A random event rolls on the focus table to decide what kind of thing
//! happens, then rolls a meaning pair for the reader to interpret.

use serde::{Deserialize, Serialize};

use fw_core::DiceSource;

use super::tables::MeaningTables;

/// What a random event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFocus {
    /// Something happens elsewhere that matters here.
    RemoteEvent,
    /// A character takes independent action.
    NpcAction,
    /// Someone new enters the story.
    IntroduceNpc,
    /// An open thread advances.
    MoveTowardThread,
    /// An open thread is set back.
    MoveAwayFromThread,
    /// An open thread resolves.
    CloseThread,
    /// Something bad happens to the protagonists.
    PcNegative,
    /// Something good happens to the protagonists.
    PcPositive,
    /// Could go either way.
    AmbiguousEvent,
    /// Something bad happens to a character.
    NpcNegative,
    /// Something good happens to a character.
    NpcPositive,
}

impl EventFocus {
    /// Look up the focus for a d100 roll. Out-of-range rolls are ambiguous.
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            1..=7 => Self::RemoteEvent,
            8..=28 => Self::NpcAction,
            29..=35 => Self::IntroduceNpc,
            36..=45 => Self::MoveTowardThread,
            46..=52 => Self::MoveAwayFromThread,
            53..=55 => Self::CloseThread,
            56..=67 => Self::PcNegative,
            68..=75 => Self::PcPositive,
            76..=83 => Self::AmbiguousEvent,
            84..=92 => Self::NpcNegative,
            93..=100 => Self::NpcPositive,
            _ => Self::AmbiguousEvent,
        }
    }

    /// Snake-case key, as stored in event records.
    pub fn key(self) -> &'static str {
        match self {
            Self::RemoteEvent => "remote_event",
            Self::NpcAction => "npc_action",
            Self::IntroduceNpc => "introduce_npc",
            Self::MoveTowardThread => "move_toward_thread",
            Self::MoveAwayFromThread => "move_away_from_thread",
            Self::CloseThread => "close_thread",
            Self::PcNegative => "pc_negative",
            Self::PcPositive => "pc_positive",
            Self::AmbiguousEvent => "ambiguous_event",
            Self::NpcNegative => "npc_negative",
            Self::NpcPositive => "npc_positive",
        }
    }
}

impl std::fmt::Display for EventFocus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteEvent => write!(f, "Remote Event"),
            Self::NpcAction => write!(f, "NPC Action"),
            Self::IntroduceNpc => write!(f, "Introduce NPC"),
            Self::MoveTowardThread => write!(f, "Move Toward Thread"),
            Self::MoveAwayFromThread => write!(f, "Move Away From Thread"),
            Self::CloseThread => write!(f, "Close Thread"),
            Self::PcNegative => write!(f, "PC Negative"),
            Self::PcPositive => write!(f, "PC Positive"),
            Self::AmbiguousEvent => write!(f, "Ambiguous Event"),
            Self::NpcNegative => write!(f, "NPC Negative"),
            Self::NpcPositive => write!(f, "NPC Positive"),
        }
    }
}

/// A generated random event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomEvent {
    /// What the event is about.
    pub focus: EventFocus,
    /// Action word.
    pub action: String,
    /// Subject word.
    pub subject: String,
    /// The focus roll.
    pub focus_roll: u32,
}

impl std::fmt::Display for RandomEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} + {}", self.focus, self.action, self.subject)
    }
}

/// Roll the focus table. One draw.
pub fn roll_event_focus(dice: &mut dyn DiceSource) -> (u32, EventFocus) {
    let roll = dice.d100();
    (roll, EventFocus::from_roll(roll))
}

/// Generate a random event: focus, then action, then subject. Three draws.
pub fn generate_random_event(dice: &mut dyn DiceSource, tables: &MeaningTables) -> RandomEvent {
    let (focus_roll, focus) = roll_event_focus(dice);
    let meaning = tables.roll(dice);
    RandomEvent {
        focus,
        action: meaning.action,
        subject: meaning.subject,
        focus_roll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::{ScriptedDice, SeededDice};

    #[test]
    fn focus_table_boundaries() {
        assert_eq!(EventFocus::from_roll(1), EventFocus::RemoteEvent);
        assert_eq!(EventFocus::from_roll(7), EventFocus::RemoteEvent);
        assert_eq!(EventFocus::from_roll(8), EventFocus::NpcAction);
        assert_eq!(EventFocus::from_roll(55), EventFocus::CloseThread);
        assert_eq!(EventFocus::from_roll(56), EventFocus::PcNegative);
        assert_eq!(EventFocus::from_roll(100), EventFocus::NpcPositive);
    }

    #[test]
    fn every_focus_reachable() {
        let mut seen = std::collections::HashSet::new();
        for roll in 1..=100 {
            seen.insert(EventFocus::from_roll(roll));
        }
        assert_eq!(seen.len(), 11);
    }

    #[test]
    fn generate_uses_three_draws_in_order() {
        let mut dice = ScriptedDice::new(vec![20, 3, 4]);
        let event = generate_random_event(&mut dice, &MeaningTables::default());
        assert_eq!(event.focus, EventFocus::NpcAction);
        assert_eq!(event.focus_roll, 20);
        assert_eq!(event.action, super::super::tables::ACTION_WORDS[2]);
        assert_eq!(event.subject, super::super::tables::SUBJECT_WORDS[3]);
        assert_eq!(dice.draws(), 3);
    }

    #[test]
    fn seeded_events_have_words() {
        let mut dice = SeededDice::new(42);
        let event = generate_random_event(&mut dice, &MeaningTables::default());
        assert!(!event.action.is_empty());
        assert!(!event.subject.is_empty());
    }

    #[test]
    fn display_and_keys() {
        assert_eq!(EventFocus::NpcAction.to_string(), "NPC Action");
        assert_eq!(EventFocus::MoveAwayFromThread.key(), "move_away_from_thread");
        assert_eq!(
            serde_json::to_string(&EventFocus::PcPositive).unwrap(),
            "\"pc_positive\""
        );
    }
}
