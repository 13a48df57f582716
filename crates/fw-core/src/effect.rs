//! Effect commands run when a faction action completes.
//!
//! Content stores effects as flat JSON objects: a `type` key plus the
//! payload fields, e.g. `{ "type": "claim_territory", "hex": "0604" }`.
//! They deserialize into a closed [`EffectCommand`] enum. Types this crate
//! does not know become [`EffectCommand::Unknown`] and known types with a
//! payload that does not parse become [`EffectCommand::Invalid`]; both keep
//! their original data so they serialize back unchanged.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::territory::TerritoryKind;

/// Territory identifiers named by a claim or cede effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerritoryTargets {
    /// Hex id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    /// Settlement id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<String>,
    /// Stronghold id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stronghold: Option<String>,
    /// Domain id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl TerritoryTargets {
    /// The named targets in hex, settlement, stronghold, domain order.
    pub fn iter(&self) -> impl Iterator<Item = (TerritoryKind, &str)> {
        [
            (TerritoryKind::Hex, &self.hex),
            (TerritoryKind::Settlement, &self.settlement),
            (TerritoryKind::Stronghold, &self.stronghold),
            (TerritoryKind::Domain, &self.domain),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.as_deref().map(|id| (kind, id)))
    }

    /// Whether no target is named.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Payload of `set_flag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetFlag {
    /// Flag name; must be non-empty.
    #[serde(default)]
    pub flag: String,
    /// Stored value.
    #[serde(default = "default_flag_value")]
    pub value: Value,
}

fn default_flag_value() -> Value {
    Value::Bool(true)
}

/// Payload of `clear_flag`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearFlag {
    /// Flag name; must be non-empty.
    pub flag: String,
}

/// Payload of `add_rumor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRumor {
    /// Rumor text.
    #[serde(default)]
    pub text: String,
    /// Where the rumor is heard.
    #[serde(default)]
    pub source: String,
    /// `true`, `partially_true`, `false`, or `unknown`.
    #[serde(default = "default_veracity")]
    pub veracity: String,
    /// Tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_veracity() -> String {
    "unknown".to_string()
}

/// Payload of `apply_modifier_next_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyModifier {
    /// Target action id, or `all`.
    #[serde(default = "default_modifier_target")]
    pub action_id: String,
    /// Signed roll modifier.
    #[serde(default)]
    pub modifier: i32,
    /// Why the modifier applies.
    #[serde(default = "default_modifier_reason")]
    pub reason: String,
}

fn default_modifier_target() -> String {
    "all".to_string()
}

fn default_modifier_reason() -> String {
    "effect applied".to_string()
}

/// Payload of `adjust_standing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustStanding {
    /// Faction or group whose standing changes; the acting faction if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<String>,
    /// Signed change.
    pub delta: i32,
}

/// Payload of `log_news`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogNews {
    /// News text.
    pub text: String,
}

/// Payload of `complete_goal`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompleteGoal {
    /// The completed goal.
    pub goal_id: String,
}

/// A single effect command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEffect", into = "RawEffect")]
pub enum EffectCommand {
    /// Take territory, contesting it if another faction holds it.
    ClaimTerritory(TerritoryTargets),
    /// Give up territory.
    CedeTerritory(TerritoryTargets),
    /// Write a process-wide flag.
    SetFlag(SetFlag),
    /// Remove a process-wide flag.
    ClearFlag(ClearFlag),
    /// Queue a rumor for delivery at the end of the cycle.
    AddRumor(AddRumor),
    /// Queue a roll modifier for the faction's next cycle.
    ApplyModifierNextTurn(ApplyModifier),
    /// Change the party's standing with a faction or group.
    AdjustStanding(AdjustStanding),
    /// Append a line to the faction's news feed.
    LogNews(LogNews),
    /// Record a goal completion in the news feed.
    CompleteGoal(CompleteGoal),
    /// An effect type this engine does not recognize.
    Unknown {
        /// The `type` string from content.
        kind: String,
        /// Remaining payload fields.
        data: Map<String, Value>,
    },
    /// A recognized effect whose payload failed to parse.
    Invalid {
        /// The `type` string from content.
        kind: String,
        /// Parse error message.
        reason: String,
        /// Remaining payload fields.
        data: Map<String, Value>,
    },
}

impl EffectCommand {
    /// The effect's `type` string.
    pub fn kind(&self) -> &str {
        match self {
            Self::ClaimTerritory(_) => "claim_territory",
            Self::CedeTerritory(_) => "cede_territory",
            Self::SetFlag(_) => "set_flag",
            Self::ClearFlag(_) => "clear_flag",
            Self::AddRumor(_) => "add_rumor",
            Self::ApplyModifierNextTurn(_) => "apply_modifier_next_turn",
            Self::AdjustStanding(_) => "adjust_standing",
            Self::LogNews(_) => "log_news",
            Self::CompleteGoal(_) => "complete_goal",
            Self::Unknown { kind, .. } | Self::Invalid { kind, .. } => kind,
        }
    }
}

/// Wire shape of an effect: `type` plus flattened payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEffect {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    data: Map<String, Value>,
}

fn parse_payload<T: DeserializeOwned>(
    raw: &RawEffect,
    wrap: fn(T) -> EffectCommand,
) -> EffectCommand {
    match serde_json::from_value::<T>(Value::Object(raw.data.clone())) {
        Ok(payload) => wrap(payload),
        Err(e) => EffectCommand::Invalid {
            kind: raw.kind.clone(),
            reason: e.to_string(),
            data: raw.data.clone(),
        },
    }
}

impl From<RawEffect> for EffectCommand {
    fn from(raw: RawEffect) -> Self {
        match raw.kind.as_str() {
            "claim_territory" => parse_payload(&raw, Self::ClaimTerritory),
            "cede_territory" => parse_payload(&raw, Self::CedeTerritory),
            "set_flag" => parse_payload(&raw, Self::SetFlag),
            "clear_flag" => parse_payload(&raw, Self::ClearFlag),
            "add_rumor" => parse_payload(&raw, Self::AddRumor),
            "apply_modifier_next_turn" => parse_payload(&raw, Self::ApplyModifierNextTurn),
            "adjust_standing" => parse_payload(&raw, Self::AdjustStanding),
            "log_news" => parse_payload(&raw, Self::LogNews),
            "complete_goal" => parse_payload(&raw, Self::CompleteGoal),
            _ => Self::Unknown {
                kind: raw.kind,
                data: raw.data,
            },
        }
    }
}

fn payload_map<T: Serialize>(payload: &T) -> Map<String, Value> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

impl From<EffectCommand> for RawEffect {
    fn from(effect: EffectCommand) -> Self {
        let kind = effect.kind().to_string();
        let data = match effect {
            EffectCommand::ClaimTerritory(p) | EffectCommand::CedeTerritory(p) => payload_map(&p),
            EffectCommand::SetFlag(p) => payload_map(&p),
            EffectCommand::ClearFlag(p) => payload_map(&p),
            EffectCommand::AddRumor(p) => payload_map(&p),
            EffectCommand::ApplyModifierNextTurn(p) => payload_map(&p),
            EffectCommand::AdjustStanding(p) => payload_map(&p),
            EffectCommand::LogNews(p) => payload_map(&p),
            EffectCommand::CompleteGoal(p) => payload_map(&p),
            EffectCommand::Unknown { data, .. } | EffectCommand::Invalid { data, .. } => data,
        };
        Self { kind, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> EffectCommand {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_claim_with_targets() {
        let effect = parse(r#"{ "type": "claim_territory", "hex": "0604", "settlement": "ford" }"#);
        let EffectCommand::ClaimTerritory(targets) = &effect else {
            panic!("expected claim, got {effect:?}");
        };
        let named: Vec<_> = targets.iter().collect();
        assert_eq!(
            named,
            vec![
                (TerritoryKind::Hex, "0604"),
                (TerritoryKind::Settlement, "ford")
            ]
        );
        assert_eq!(effect.kind(), "claim_territory");
    }

    #[test]
    fn payload_defaults() {
        let EffectCommand::SetFlag(flag) = parse(r#"{ "type": "set_flag", "flag": "war" }"#) else {
            panic!("expected set_flag");
        };
        assert_eq!(flag.value, Value::Bool(true));

        let EffectCommand::ApplyModifierNextTurn(m) =
            parse(r#"{ "type": "apply_modifier_next_turn", "modifier": -1 }"#)
        else {
            panic!("expected modifier");
        };
        assert_eq!(m.action_id, "all");
        assert_eq!(m.reason, "effect applied");

        let EffectCommand::AddRumor(r) = parse(r#"{ "type": "add_rumor", "text": "Wolves" }"#)
        else {
            panic!("expected rumor");
        };
        assert_eq!(r.veracity, "unknown");
    }

    #[test]
    fn unknown_type_is_preserved() {
        let json = r#"{ "type": "summon_dragon", "size": "large" }"#;
        let effect = parse(json);
        assert!(matches!(&effect, EffectCommand::Unknown { kind, .. } if kind == "summon_dragon"));
        let back = serde_json::to_value(&effect).unwrap();
        assert_eq!(back, serde_json::from_str::<Value>(json).unwrap());
    }

    #[test]
    fn malformed_payload_is_invalid() {
        let effect = parse(r#"{ "type": "adjust_standing", "delta": "lots" }"#);
        assert!(
            matches!(&effect, EffectCommand::Invalid { kind, .. } if kind == "adjust_standing")
        );
    }

    #[test]
    fn known_effect_round_trips() {
        let effect = EffectCommand::AdjustStanding(AdjustStanding {
            faction: Some("guild".into()),
            delta: 2,
        });
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains(r#""type":"adjust_standing""#));
        assert_eq!(parse(&json), effect);
    }

    #[test]
    fn empty_targets() {
        assert!(TerritoryTargets::default().is_empty());
    }
}
