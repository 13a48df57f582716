//! Immutable faction definitions loaded from content.

use serde::{Deserialize, Serialize};

use crate::effect::EffectCommand;
use crate::territory::HomeTerritory;

/// How large an action is; determines its default segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScope {
    /// A short task.
    Task,
    /// A standard mission.
    #[default]
    Mission,
    /// A long-term goal.
    Goal,
    /// A military or covert operation.
    Operation,
    /// Negotiation with other powers.
    Diplomacy,
}

/// Something an action is aimed at (a hex, a rival, a settlement).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTarget {
    /// Kind of target, free-form (`hex`, `faction`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Target identifier.
    pub id: String,
}

/// A template for an action a faction can pursue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    /// Unique id within the faction's library.
    pub action_id: String,
    /// Display name.
    pub name: String,
    /// Action scope.
    #[serde(default)]
    pub scope: ActionScope,
    /// Description for status displays.
    #[serde(default)]
    pub description: String,
    /// Goal this action serves, if any.
    #[serde(default)]
    pub goal_id: Option<String>,
    /// Resource tags the action draws on.
    #[serde(default)]
    pub resource_tags: Vec<String>,
    /// What the action is aimed at.
    #[serde(default)]
    pub targets: Vec<ActionTarget>,
    /// Fixed segment count; the scope default applies when absent.
    #[serde(default)]
    pub segments: Option<u32>,
    /// Effects applied, in order, when the action completes.
    #[serde(default)]
    pub on_complete: Vec<EffectCommand>,
}

/// Visibility of a goal to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalVisibility {
    /// Publicly known.
    #[default]
    Landmark,
    /// Discoverable through play.
    Hidden,
    /// Known only to the faction.
    Secret,
}

/// A long-term faction goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Goal id.
    pub goal_id: String,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Who can see the goal.
    #[serde(default)]
    pub visibility: GoalVisibility,
    /// Relative priority, higher first.
    #[serde(default)]
    pub priority: i32,
}

/// A resource a faction can draw on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource id.
    pub resource_id: String,
    /// Display name.
    pub name: String,
    /// Tags matched against action resource tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An outpost or cell of a faction away from its home territory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclave {
    /// Where the enclave sits (hex or settlement id).
    pub location: String,
    /// Role of the enclave.
    #[serde(default)]
    pub role: String,
    /// Status such as `active` or `destroyed`.
    #[serde(default = "default_enclave_status")]
    pub status: String,
}

fn default_enclave_status() -> String {
    "active".to_string()
}

/// Immutable description of a faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionDefinition {
    /// Unique faction id.
    pub faction_id: String,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Alignment label.
    #[serde(default)]
    pub alignment: Option<String>,
    /// Faction type label.
    #[serde(default)]
    pub faction_type: Option<String>,
    /// Tags used for relationship-group matching.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Territory held at the start of play.
    #[serde(default)]
    pub home_territory: Option<HomeTerritory>,
    /// Outposts away from home.
    #[serde(default)]
    pub enclaves: Vec<Enclave>,
    /// Resources the faction can draw on.
    #[serde(default)]
    pub resources: Vec<Resource>,
    /// Long-term goals.
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// All actions the faction can pursue.
    #[serde(default)]
    pub action_library: Vec<ActionTemplate>,
    /// Action ids active at the start of play.
    #[serde(default)]
    pub starting_actions: Vec<String>,
}

impl FactionDefinition {
    /// Find an action template by id.
    pub fn action_template(&self, action_id: &str) -> Option<&ActionTemplate> {
        self.action_library.iter().find(|t| t.action_id == action_id)
    }

    /// Find a goal by id.
    pub fn goal(&self, goal_id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.goal_id == goal_id)
    }

    /// Whether any resource carries `tag`.
    pub fn has_resource_tag(&self, tag: &str) -> bool {
        self.resources.iter().any(|r| r.tags.iter().any(|t| t == tag))
    }

    /// Whether the faction carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
