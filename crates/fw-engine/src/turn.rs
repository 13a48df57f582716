//! One faction's turn within a cycle.
//!
//! Each active action, up to the faction's allowance, rolls the progress die,
//! adds its queued modifiers and advances. Completed actions run their
//! `on_complete` effects and are then replaced from the action library.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use fw_core::state::{FactionLogEntry, Rumor, modifier_total};
use fw_core::{
    ActionInstance, ActionTemplate, FactionDefinition, FactionTurnState, PartyFactionState,
};
use fw_oracle::OracleEvent;

use crate::effects::{ContestContext, EffectResult, EffectsInterpreter};

/// Oracle tag for complication events.
pub const COMPLICATION_TAG: &str = "action_complication";

/// Outcome of one action's roll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRollResult {
    /// Action rolled for.
    pub action_id: String,
    /// Raw die roll.
    pub roll: u32,
    /// Clamped modifier.
    pub modifier: i32,
    /// `roll + modifier`.
    pub total: i32,
    /// Progress gained.
    pub delta: u32,
    /// Progress after the roll.
    pub new_progress: u32,
    /// Segments needed.
    pub segments: u32,
    /// Whether the action completed.
    pub completed: bool,
    /// Whether the raw roll flagged a complication.
    pub complication: bool,
    /// Completion effects, in application order.
    #[serde(default)]
    pub effects_applied: Vec<EffectResult>,
    /// Random event rolled for the complication.
    #[serde(default)]
    pub oracle_event: Option<OracleEvent>,
}

/// Outcome of one faction's turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionCycleResult {
    /// Faction id.
    pub faction_id: String,
    /// Rolls, in action order.
    pub actions: Vec<ActionRollResult>,
    /// Ids of completed actions removed from the active list.
    pub actions_replaced: Vec<String>,
    /// Territory points at the start of the turn.
    pub territory_points: u32,
    /// Level at the start of the turn.
    pub level: u32,
}

/// Outcome of one cycle across every faction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// 1-based cycle number.
    pub cycle_number: u64,
    /// Game date of the cycle.
    pub date: String,
    /// Per-faction results, in faction id order.
    pub faction_results: Vec<FactionCycleResult>,
    /// Rumors queued by effects during the cycle.
    pub rumors_generated: Vec<Rumor>,
    /// Every oracle event raised during the cycle, in order.
    pub oracle_events: Vec<OracleEvent>,
}

impl CycleResult {
    /// Actions completed across all factions, as `(faction_id, action_id)`.
    pub fn completions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.faction_results.iter().flat_map(|f| {
            f.actions
                .iter()
                .filter(|a| a.completed)
                .map(move |a| (f.faction_id.as_str(), a.action_id.as_str()))
        })
    }
}

/// Run one faction's turn.
///
/// The faction's queued modifiers are taken up front and apply to this turn
/// only. Oracle events raised during the turn are appended to `oracle_events`
/// in the order they occur.
pub(crate) fn run_faction_turn(
    definition: &FactionDefinition,
    state: &mut FactionTurnState,
    mut party: Option<&mut PartyFactionState>,
    effects: &mut EffectsInterpreter,
    ctx: &mut ContestContext<'_>,
    oracle_events: &mut Vec<OracleEvent>,
) -> FactionCycleResult {
    let rules = ctx.rules;
    let territory_points = state
        .territory
        .compute_points(&rules.territory_point_values);
    let level = rules.level_for_points(territory_points);
    let allowance = rules.actions_for_level(level);
    let queued = std::mem::take(&mut state.modifiers_next_cycle);

    let mut actions = Vec::new();
    let mut completed = Vec::new();

    for idx in 0..allowance.min(state.active_actions.len()) {
        let action_id = state.active_actions[idx].action_id.clone();

        let roll = ctx.dice.roll(rules.die());
        let modifier = rules.clamp_modifier(modifier_total(&queued, &action_id));
        let total = i32::try_from(roll).unwrap_or(i32::MAX).saturating_add(modifier);
        let delta = rules.progress_delta(total);
        let complication = rules.is_complication(roll);

        let oracle_event = match ctx.oracle.as_deref_mut() {
            Some(oracle) if complication && oracle.config().complication_events() => {
                Some(oracle.random_event(
                    &mut *ctx.dice,
                    ctx.date,
                    Some(state.faction_id.as_str()),
                    COMPLICATION_TAG,
                ))
            }
            _ => None,
        };

        let action = &mut state.active_actions[idx];
        let new_progress = action.advance(delta);
        let segments = action.segments;
        let done = action.is_complete();

        debug!(
            faction = %state.faction_id,
            action = %action_id,
            roll,
            modifier,
            delta,
            progress = new_progress,
            segments,
            "action roll"
        );

        let mut effect_results = Vec::new();
        if done {
            match definition.action_template(&action_id) {
                Some(template) => {
                    effect_results = effects.apply_effects(
                        &template.on_complete,
                        state,
                        party.as_deref_mut(),
                        ctx,
                    );
                }
                None => warn!(
                    faction = %state.faction_id,
                    action = %action_id,
                    "completed action has no template; no effects applied"
                ),
            }
            completed.push(idx);
        }

        if let Some(event) = &oracle_event {
            oracle_events.push(event.clone());
        }
        for result in &effect_results {
            oracle_events.extend(result.oracle_events.iter().cloned());
        }

        state.log.push(FactionLogEntry {
            date: ctx.date.to_string(),
            action_id: action_id.clone(),
            roll,
            modifier,
            delta,
            completed: done,
            complication,
            effects_applied: effect_results.iter().map(|r| r.description.clone()).collect(),
            notes: String::new(),
        });

        actions.push(ActionRollResult {
            action_id,
            roll,
            modifier,
            total,
            delta,
            new_progress,
            segments,
            completed: done,
            complication,
            effects_applied: effect_results,
            oracle_event,
        });
    }

    let mut actions_replaced = Vec::new();
    for &idx in completed.iter().rev() {
        let finished = state.active_actions.remove(idx);
        replace_action(definition, state, idx, ctx);
        actions_replaced.push(finished.action_id);
    }

    FactionCycleResult {
        faction_id: state.faction_id.clone(),
        actions,
        actions_replaced,
        territory_points,
        level,
    }
}

/// Start a new action at `idx`, picked uniformly from library templates not
/// currently active. Leaves the slot empty when none is eligible.
fn replace_action(
    definition: &FactionDefinition,
    state: &mut FactionTurnState,
    idx: usize,
    ctx: &mut ContestContext<'_>,
) {
    let eligible: Vec<&ActionTemplate> = definition
        .action_library
        .iter()
        .filter(|t| !state.is_active(&t.action_id))
        .collect();

    let Some(pick) = ctx.dice.pick_index(eligible.len()) else {
        warn!(faction = %state.faction_id, "no eligible action to replace a completed one");
        return;
    };
    let template = eligible[pick];
    let segments = template
        .segments
        .unwrap_or_else(|| ctx.rules.default_segments(template.scope));
    debug!(
        faction = %state.faction_id,
        action = %template.action_id,
        segments,
        "new action"
    );
    let slot = idx.min(state.active_actions.len());
    state.active_actions.insert(
        slot,
        ActionInstance::new(
            template.action_id.clone(),
            template.goal_id.clone(),
            segments,
            ctx.date,
        ),
    );
}
