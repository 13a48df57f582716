//! Mutable per-faction turn state.

use serde::{Deserialize, Serialize};

use crate::territory::Territory;

/// Modifier target that applies to every action.
pub const ALL_ACTIONS: &str = "all";

/// An action a faction is currently pursuing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInstance {
    /// Template id.
    pub action_id: String,
    /// Goal the action serves, if any.
    #[serde(default)]
    pub goal_id: Option<String>,
    /// Segments filled so far.
    #[serde(default)]
    pub progress: u32,
    /// Segments needed to complete.
    pub segments: u32,
    /// Date the action started.
    #[serde(default)]
    pub started_on: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl ActionInstance {
    /// Start a fresh action at zero progress.
    pub fn new(
        action_id: impl Into<String>,
        goal_id: Option<String>,
        segments: u32,
        started_on: impl Into<String>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            goal_id,
            progress: 0,
            segments,
            started_on: started_on.into(),
            notes: String::new(),
        }
    }

    /// Whether progress has reached the segment count.
    pub fn is_complete(&self) -> bool {
        self.progress >= self.segments
    }

    /// Add progress. Returns the new progress value.
    pub fn advance(&mut self, delta: u32) -> u32 {
        self.progress = self.progress.saturating_add(delta);
        self.progress
    }
}

/// One entry in a faction's roll log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionLogEntry {
    /// Date of the roll.
    pub date: String,
    /// Action rolled for.
    pub action_id: String,
    /// Raw die roll.
    pub roll: u32,
    /// Clamped modifier applied.
    pub modifier: i32,
    /// Progress gained.
    pub delta: u32,
    /// Whether the action completed.
    pub completed: bool,
    /// Whether the raw roll flagged a complication.
    #[serde(default)]
    pub complication: bool,
    /// Descriptions of effects applied on completion.
    #[serde(default)]
    pub effects_applied: Vec<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A roll modifier queued for the next cycle only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedModifier {
    /// Target action id, or [`ALL_ACTIONS`].
    pub action_id: String,
    /// Signed modifier.
    pub modifier: i32,
    /// Why it applies.
    #[serde(default)]
    pub reason: String,
}

/// Sum of the entries in `queue` that target `action_id` or [`ALL_ACTIONS`].
pub fn modifier_total(queue: &[QueuedModifier], action_id: &str) -> i32 {
    queue
        .iter()
        .filter(|m| m.action_id == action_id || m.action_id == ALL_ACTIONS)
        .map(|m| m.modifier)
        .sum()
}

/// A rumor produced by a faction effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rumor {
    /// Rumor text.
    pub text: String,
    /// Faction whose action produced the rumor.
    pub source_faction: String,
    /// Where the rumor is heard.
    #[serde(default)]
    pub source: String,
    /// How true the rumor is.
    #[serde(default)]
    pub veracity: String,
    /// Tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Date the rumor appeared.
    #[serde(default)]
    pub date: String,
}

/// Dynamic state of one faction for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionTurnState {
    /// Faction id.
    pub faction_id: String,
    /// Currently held territory.
    #[serde(default)]
    pub territory: Territory,
    /// Actions in progress, in roll order.
    #[serde(default)]
    pub active_actions: Vec<ActionInstance>,
    /// Modifiers for the faction's next turn. The engine takes the whole
    /// queue when the turn starts.
    #[serde(default)]
    pub modifiers_next_cycle: Vec<QueuedModifier>,
    /// Append-only roll log.
    #[serde(default)]
    pub log: Vec<FactionLogEntry>,
    /// Append-only news feed.
    #[serde(default)]
    pub news: Vec<String>,
}

impl FactionTurnState {
    /// Empty state for a faction.
    pub fn new(faction_id: impl Into<String>) -> Self {
        Self {
            faction_id: faction_id.into(),
            territory: Territory::default(),
            active_actions: Vec::new(),
            modifiers_next_cycle: Vec::new(),
            log: Vec::new(),
            news: Vec::new(),
        }
    }

    /// Whether an action with this id is currently active.
    pub fn is_active(&self, action_id: &str) -> bool {
        self.active_actions.iter().any(|a| a.action_id == action_id)
    }

    /// Total queued modifier for an action: its own entries plus `all` entries,
    /// before clamping.
    pub fn queued_modifier_for(&self, action_id: &str) -> i32 {
        modifier_total(&self.modifiers_next_cycle, action_id)
    }

    /// The last `n` news lines, oldest first.
    pub fn recent_news(&self, n: usize) -> &[String] {
        let start = self.news.len().saturating_sub(n);
        &self.news[start..]
    }
}
