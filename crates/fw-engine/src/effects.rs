//! Effects interpreter.
//!
//! Runs the [`EffectCommand`]s attached to completed actions. Every effect
//! except `claim_territory` is a plain mutation of the acting faction's
//! state, the party state, or the interpreter's own flag map and rumor
//! queue. Claims may be contested: when another faction holds the asset and
//! the oracle is configured for it, a single fate check decides the outcome.
//!
//! A handler either completes its mutation or performs none. Failures come
//! back as an [`EffectResult`] with `success == false`; nothing here returns
//! an error or panics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use fw_core::effect::{
    AddRumor, AdjustStanding, ApplyModifier, ClearFlag, CompleteGoal, LogNews, SetFlag,
    TerritoryTargets,
};
use fw_core::state::{QueuedModifier, Rumor};
use fw_core::{
    DiceSource, EffectCommand, FactionRules, FactionTurnState, PartyFactionState,
    RelationshipResolver, TerritoryKind,
};
use fw_oracle::{FactionOracle, OracleEvent};

/// Oracle tag for contested claims.
pub const CONTESTED_TERRITORY_TAG: &str = "contested_territory";

/// Everything a contested claim needs besides the acting faction.
///
/// Built once per cycle. `factions` holds every faction except the one
/// currently acting, whose state is lent to the interpreter separately.
pub struct ContestContext<'a> {
    /// Game date of the cycle.
    pub date: &'a str,
    /// Faction rules.
    pub rules: &'a FactionRules,
    /// Relationship resolver, if relations were loaded.
    pub relations: Option<&'a RelationshipResolver>,
    /// Oracle, if one is attached.
    pub oracle: Option<&'a mut FactionOracle>,
    /// The engine's dice.
    pub dice: &'a mut dyn DiceSource,
    /// The other factions' states.
    pub factions: &'a mut BTreeMap<String, FactionTurnState>,
}

/// Outcome of applying one effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectResult {
    /// Whether the effect was applied.
    pub success: bool,
    /// The effect's `type` string.
    pub effect_type: String,
    /// Human-readable summary.
    pub description: String,
    /// Structured record of what changed.
    #[serde(default)]
    pub changes: Map<String, Value>,
    /// Why the effect failed.
    #[serde(default)]
    pub error: Option<String>,
    /// Oracle events raised while resolving the effect.
    #[serde(default)]
    pub oracle_events: Vec<OracleEvent>,
}

impl EffectResult {
    fn ok(effect_type: &str, description: impl Into<String>) -> Self {
        Self {
            success: true,
            effect_type: effect_type.to_string(),
            description: description.into(),
            changes: Map::new(),
            error: None,
            oracle_events: Vec::new(),
        }
    }

    fn failed(effect_type: &str, description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            effect_type: effect_type.to_string(),
            description: description.into(),
            changes: Map::new(),
            error: Some(error.into()),
            oracle_events: Vec::new(),
        }
    }

    fn with_change(mut self, key: &str, value: Value) -> Self {
        self.changes.insert(key.to_string(), value);
        self
    }
}

/// Applies effect commands and owns the process-wide flag map and the
/// pending rumor queue.
#[derive(Debug, Clone, Default)]
pub struct EffectsInterpreter {
    flags: BTreeMap<String, Value>,
    pending_rumors: Vec<Rumor>,
}

impl EffectsInterpreter {
    /// A fresh interpreter with no flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide flags.
    pub fn flags(&self) -> &BTreeMap<String, Value> {
        &self.flags
    }

    /// Replace the flag map, e.g. when restoring a snapshot.
    pub fn set_flags(&mut self, flags: BTreeMap<String, Value>) {
        self.flags = flags;
    }

    /// Rumors queued since the last drain.
    pub fn pending_rumors(&self) -> &[Rumor] {
        &self.pending_rumors
    }

    /// Take every queued rumor.
    pub fn drain_pending_rumors(&mut self) -> Vec<Rumor> {
        std::mem::take(&mut self.pending_rumors)
    }

    /// Apply effects in order, one result per effect.
    pub fn apply_effects(
        &mut self,
        effects: &[EffectCommand],
        state: &mut FactionTurnState,
        mut party: Option<&mut PartyFactionState>,
        ctx: &mut ContestContext<'_>,
    ) -> Vec<EffectResult> {
        effects
            .iter()
            .map(|effect| self.apply_effect(effect, state, party.as_deref_mut(), ctx))
            .collect()
    }

    /// Apply a single effect on behalf of `state`'s faction.
    pub fn apply_effect(
        &mut self,
        effect: &EffectCommand,
        state: &mut FactionTurnState,
        party: Option<&mut PartyFactionState>,
        ctx: &mut ContestContext<'_>,
    ) -> EffectResult {
        let kind = effect.kind();
        match effect {
            EffectCommand::ClaimTerritory(targets) => claim_territory(kind, targets, state, ctx),
            EffectCommand::CedeTerritory(targets) => cede_territory(kind, targets, state),
            EffectCommand::SetFlag(p) => self.set_flag(kind, p),
            EffectCommand::ClearFlag(p) => self.clear_flag(kind, p),
            EffectCommand::AddRumor(p) => self.add_rumor(kind, p, state, ctx.date),
            EffectCommand::ApplyModifierNextTurn(p) => apply_modifier(kind, p, state),
            EffectCommand::AdjustStanding(p) => adjust_standing(kind, p, state, party, ctx.rules),
            EffectCommand::LogNews(p) => log_news(kind, p, state, ctx.date),
            EffectCommand::CompleteGoal(p) => complete_goal(kind, p, state, ctx.date),
            EffectCommand::Unknown { .. } => {
                warn!(faction = %state.faction_id, "unknown effect type: {kind}");
                EffectResult::failed(
                    kind,
                    "Unknown effect type",
                    format!("No handler for effect type: {kind}"),
                )
            }
            EffectCommand::Invalid { reason, .. } => {
                warn!(faction = %state.faction_id, "invalid {kind} effect: {reason}");
                EffectResult::failed(kind, format!("Invalid {kind} effect"), reason.clone())
            }
        }
    }

    fn set_flag(&mut self, kind: &str, payload: &SetFlag) -> EffectResult {
        if payload.flag.is_empty() {
            return EffectResult::failed(kind, "Missing flag name", "flag field required");
        }
        self.flags
            .insert(payload.flag.clone(), payload.value.clone());
        EffectResult::ok(kind, format!("set flag {} = {}", payload.flag, payload.value))
            .with_change("flag", json!(payload.flag))
            .with_change("value", payload.value.clone())
    }

    fn clear_flag(&mut self, kind: &str, payload: &ClearFlag) -> EffectResult {
        if payload.flag.is_empty() {
            return EffectResult::failed(kind, "Missing flag name", "flag field required");
        }
        let was_set = self.flags.remove(&payload.flag).is_some();
        let note = if was_set { "was set" } else { "was not set" };
        EffectResult::ok(kind, format!("cleared flag {} ({note})", payload.flag))
            .with_change("flag", json!(payload.flag))
            .with_change("was_set", json!(was_set))
    }

    fn add_rumor(
        &mut self,
        kind: &str,
        payload: &AddRumor,
        state: &FactionTurnState,
        date: &str,
    ) -> EffectResult {
        self.pending_rumors.push(Rumor {
            text: payload.text.clone(),
            source_faction: state.faction_id.clone(),
            source: payload.source.clone(),
            veracity: payload.veracity.clone(),
            tags: payload.tags.clone(),
            date: date.to_string(),
        });
        EffectResult::ok(kind, format!("added rumor: {}...", preview(&payload.text)))
            .with_change("rumor_text", json!(payload.text))
    }
}

fn claim_territory(
    kind: &str,
    targets: &TerritoryTargets,
    state: &mut FactionTurnState,
    ctx: &mut ContestContext<'_>,
) -> EffectResult {
    let mut result = EffectResult::ok(kind, "");
    let mut parts = Vec::new();

    for (asset, id) in targets.iter() {
        let holder = ctx
            .factions
            .iter()
            .find(|(fid, other)| **fid != state.faction_id && other.territory.holds(asset, id))
            .map(|(fid, _)| fid.clone());

        let won = match &holder {
            None => true,
            Some(defender) => match contest(ctx, state, defender, asset, id) {
                Some(event) => {
                    let yes = event.is_yes();
                    result.oracle_events.push(event);
                    yes
                }
                None => true,
            },
        };

        if won {
            let mut custom = None;
            if let Some(defender) = &holder
                && let Some(other) = ctx.factions.get_mut(defender)
            {
                custom = other.territory.custom_points(asset, id);
                other.territory.remove(asset, id);
                result
                    .changes
                    .insert(format!("{asset}_taken_from"), json!(defender));
            }
            state.territory.insert(asset, id);
            // The holding keeps its weight under the new holder.
            if let Some(points) = custom {
                state.territory.set_custom_points(asset, id, points);
            }
            result.changes.insert(format!("{asset}_added"), json!(id));
            parts.push(format!("claimed {asset} {id}"));
        } else {
            parts.push(format!("failed to claim {asset} {id} (contested)"));
        }
    }

    result.description = if parts.is_empty() {
        "no territory claimed".to_string()
    } else {
        parts.join(", ")
    };
    result
}

/// Ask the oracle whether the attacker takes a held asset. `None` when no
/// oracle is attached or contests are switched off.
fn contest(
    ctx: &mut ContestContext<'_>,
    attacker: &FactionTurnState,
    defender_id: &str,
    asset: TerritoryKind,
    id: &str,
) -> Option<OracleEvent> {
    let oracle = ctx
        .oracle
        .as_deref_mut()
        .filter(|o| o.config().contested_territory())?;

    let values = &ctx.rules.territory_point_values;
    let attacker_level = ctx
        .rules
        .level_for_points(attacker.territory.compute_points(values));
    let defender_level = ctx.factions.get(defender_id).map_or(1, |d| {
        ctx.rules
            .level_for_points(d.territory.compute_points(values))
    });
    let score = ctx
        .relations
        .map_or(0, |r| r.get_score(&attacker.faction_id, defender_id));
    let likelihood = oracle.determine_contest_likelihood(attacker_level, defender_level, score);

    debug!(
        attacker = %attacker.faction_id,
        defender = defender_id,
        attacker_level,
        defender_level,
        score,
        %likelihood,
        "contesting {asset} {id}"
    );

    let question = format!(
        "Does {} successfully claim {asset} {id} from {defender_id}?",
        attacker.faction_id
    );
    Some(oracle.fate_check(
        &mut *ctx.dice,
        &question,
        likelihood,
        ctx.date,
        Some(attacker.faction_id.as_str()),
        CONTESTED_TERRITORY_TAG,
    ))
}

fn cede_territory(
    kind: &str,
    targets: &TerritoryTargets,
    state: &mut FactionTurnState,
) -> EffectResult {
    let mut result = EffectResult::ok(kind, "");
    let mut parts = Vec::new();
    for (asset, id) in targets.iter() {
        if state.territory.remove(asset, id) {
            result.changes.insert(format!("{asset}_removed"), json!(id));
            parts.push(format!("ceded {asset} {id}"));
        }
    }
    result.description = if parts.is_empty() {
        "no territory ceded".to_string()
    } else {
        parts.join(", ")
    };
    result
}

fn apply_modifier(kind: &str, payload: &ApplyModifier, state: &mut FactionTurnState) -> EffectResult {
    state.modifiers_next_cycle.push(QueuedModifier {
        action_id: payload.action_id.clone(),
        modifier: payload.modifier,
        reason: payload.reason.clone(),
    });
    EffectResult::ok(
        kind,
        format!(
            "applied modifier {:+} to {}",
            payload.modifier, payload.action_id
        ),
    )
    .with_change("action_id", json!(payload.action_id))
    .with_change("modifier", json!(payload.modifier))
    .with_change("reason", json!(payload.reason))
}

fn adjust_standing(
    kind: &str,
    payload: &AdjustStanding,
    state: &FactionTurnState,
    party: Option<&mut PartyFactionState>,
    rules: &FactionRules,
) -> EffectResult {
    let Some(party) = party else {
        warn!(faction = %state.faction_id, "adjust_standing with no party state");
        return EffectResult::failed(kind, "No party state available", "party_state required");
    };
    let target = payload.faction.as_deref().unwrap_or(&state.faction_id);
    let (old, new) =
        party.adjust_standing(target, payload.delta, rules.standing_min, rules.standing_max);
    EffectResult::ok(kind, format!("adjusted standing with {target}: {old} -> {new}"))
        .with_change("faction", json!(target))
        .with_change("old_standing", json!(old))
        .with_change("new_standing", json!(new))
        .with_change("delta", json!(payload.delta))
}

fn log_news(kind: &str, payload: &LogNews, state: &mut FactionTurnState, date: &str) -> EffectResult {
    let line = dated(date, &payload.text);
    state.news.push(line.clone());
    EffectResult::ok(kind, format!("logged news: {}...", preview(&payload.text)))
        .with_change("news", json!(line))
}

fn complete_goal(
    kind: &str,
    payload: &CompleteGoal,
    state: &mut FactionTurnState,
    date: &str,
) -> EffectResult {
    let line = dated(date, &format!("Goal completed: {}", payload.goal_id));
    state.news.push(line);
    EffectResult::ok(kind, format!("completed goal: {}", payload.goal_id))
        .with_change("goal_id", json!(payload.goal_id))
}

fn dated(date: &str, text: &str) -> String {
    if date.is_empty() {
        text.to_string()
    } else {
        format!("[{date}] {text}")
    }
}

/// First 50 characters of a text, for descriptions.
fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}
