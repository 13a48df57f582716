use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use fw_core::{
    ActionInstance, DiceSource, DiceState, FactionDefinition, FactionRules, FactionTurnState,
    PartyFactionState, RelationshipResolver, SeededDice, Territory,
};
use fw_oracle::FactionOracle;

use crate::clock::FactionClock;
use crate::config::EngineConfig;
use crate::effects::{ContestContext, EffectsInterpreter};
use crate::error::{EngineError, EngineResult};
use crate::party::{FactionWork, FactionWorkResult, perform_faction_work};
use crate::snapshot::EngineSnapshot;
use crate::turn::{CycleResult, run_faction_turn};

/// Observer invoked after every cycle.
pub type CycleCallback = Box<dyn FnMut(&CycleResult)>;

/// The faction turn engine.
///
/// Owns the immutable content (rules, definitions, relations), every
/// faction's turn state, the optional party state and oracle, and the single
/// dice stream all randomness is drawn from. Driven by [`advance`], which
/// runs at most one cycle per call.
///
/// [`advance`]: FactionEngine::advance
pub struct FactionEngine {
    rules: FactionRules,
    definitions: BTreeMap<String, FactionDefinition>,
    relations: Option<RelationshipResolver>,
    oracle: Option<FactionOracle>,
    dice: Box<dyn DiceSource>,
    effects: EffectsInterpreter,
    states: BTreeMap<String, FactionTurnState>,
    party: Option<PartyFactionState>,
    clock: FactionClock,
    callbacks: Vec<CycleCallback>,
    config: EngineConfig,
    warnings: Vec<String>,
}

impl std::fmt::Debug for FactionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactionEngine")
            .field("factions", &self.states.len())
            .field("cycles", &self.clock.cycles_completed())
            .field("date", &self.clock.current_date())
            .field("oracle", &self.oracle.is_some())
            .field("party", &self.party.is_some())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl FactionEngine {
    /// Create an engine and initialize every faction from its definition.
    ///
    /// Questionable rules and content never fail construction; they are
    /// logged and collected in [`warnings`](Self::warnings).
    pub fn new(
        rules: FactionRules,
        definitions: BTreeMap<String, FactionDefinition>,
        config: EngineConfig,
    ) -> Self {
        let mut warnings = rules.validate();
        for warning in &warnings {
            warn!("rules: {warning}");
        }

        let clock = FactionClock::new(config.start_date);
        let states = init_states(&rules, &definitions, clock.current_date(), &mut warnings);

        Self {
            dice: Box::new(SeededDice::new(config.seed)),
            rules,
            definitions,
            relations: None,
            oracle: None,
            effects: EffectsInterpreter::new(),
            states,
            party: None,
            clock,
            callbacks: Vec::new(),
            config,
            warnings,
        }
    }

    /// Attach a relationship resolver.
    pub fn with_relations(mut self, relations: RelationshipResolver) -> Self {
        self.relations = Some(relations);
        self
    }

    /// Attach an oracle.
    pub fn with_oracle(mut self, oracle: FactionOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Attach party state.
    pub fn with_party(mut self, party: PartyFactionState) -> Self {
        self.party = Some(party);
        self
    }

    /// Replace the seeded dice, e.g. with scripted rolls.
    pub fn with_dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// Advance time. Runs one cycle when the accumulated days reach the
    /// cadence; any remainder carries toward the next one.
    pub fn advance(&mut self, days: u32) -> Option<CycleResult> {
        if self.clock.advance(days, self.rules.cadence()) {
            Some(self.run_cycle())
        } else {
            None
        }
    }

    /// Run one cycle now, regardless of accumulated days.
    pub fn run_cycle(&mut self) -> CycleResult {
        let cycle_number = self.clock.begin_cycle();
        if let Some(oracle) = self.oracle.as_mut() {
            oracle.reset_cycle_counter();
        }
        let date = self.clock.current_date().to_string();
        debug!(cycle = cycle_number, %date, "cycle start");

        let ids: Vec<String> = self.states.keys().cloned().collect();
        let mut faction_results = Vec::with_capacity(ids.len());
        let mut oracle_events = Vec::new();

        for id in ids {
            let Some(definition) = self.definitions.get(&id) else {
                warn!(faction = %id, "no definition for faction state; skipping turn");
                continue;
            };
            let Some(mut state) = self.states.remove(&id) else {
                continue;
            };

            let mut ctx = ContestContext {
                date: &date,
                rules: &self.rules,
                relations: self.relations.as_ref(),
                oracle: self.oracle.as_mut(),
                dice: &mut *self.dice,
                factions: &mut self.states,
            };
            let result = run_faction_turn(
                definition,
                &mut state,
                self.party.as_mut(),
                &mut self.effects,
                &mut ctx,
                &mut oracle_events,
            );

            self.states.insert(id, state);
            faction_results.push(result);
        }

        let result = CycleResult {
            cycle_number,
            date,
            faction_results,
            rumors_generated: self.effects.drain_pending_rumors(),
            oracle_events,
        };

        for callback in &mut self.callbacks {
            callback(&result);
        }

        info!(
            cycle = result.cycle_number,
            factions = result.faction_results.len(),
            completed = result.completions().count(),
            rumors = result.rumors_generated.len(),
            oracle_events = result.oracle_events.len(),
            "cycle complete"
        );
        result
    }

    /// Rebuild every faction from its definition and restart the clock and
    /// flags. Party state, oracle and dice are left as they are.
    pub fn reset_state(&mut self) {
        self.clock = FactionClock::new(self.config.start_date);
        self.effects = EffectsInterpreter::new();
        let mut warnings = Vec::new();
        self.states = init_states(
            &self.rules,
            &self.definitions,
            self.clock.current_date(),
            &mut warnings,
        );
    }

    /// Register an observer called after every cycle, in registration order.
    pub fn register_cycle_callback(&mut self, callback: CycleCallback) {
        self.callbacks.push(callback);
    }

    /// Set the current game date string.
    pub fn set_current_date(&mut self, date: &str) {
        self.clock.set_current_date(date);
    }

    /// The current game date string.
    pub fn current_date(&self) -> &str {
        self.clock.current_date()
    }

    /// The engine clock.
    pub fn clock(&self) -> &FactionClock {
        &self.clock
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The faction rules.
    pub fn rules(&self) -> &FactionRules {
        &self.rules
    }

    /// Warnings collected while building the engine.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// All faction definitions, by id.
    pub fn definitions(&self) -> &BTreeMap<String, FactionDefinition> {
        &self.definitions
    }

    /// A faction's definition.
    pub fn definition(&self, faction_id: &str) -> Option<&FactionDefinition> {
        self.definitions.get(faction_id)
    }

    /// The relationship resolver, if attached.
    pub fn relations(&self) -> Option<&RelationshipResolver> {
        self.relations.as_ref()
    }

    /// The oracle, if attached.
    pub fn oracle(&self) -> Option<&FactionOracle> {
        self.oracle.as_ref()
    }

    /// The oracle, mutably.
    pub fn oracle_mut(&mut self) -> Option<&mut FactionOracle> {
        self.oracle.as_mut()
    }

    /// The effects interpreter (flags and pending rumors).
    pub fn effects(&self) -> &EffectsInterpreter {
        &self.effects
    }

    /// Position of the dice stream.
    pub fn dice_state(&self) -> DiceState {
        self.dice.state()
    }

    /// All faction states, by id.
    pub fn faction_states(&self) -> &BTreeMap<String, FactionTurnState> {
        &self.states
    }

    /// A faction's current state.
    pub fn faction_state(&self, faction_id: &str) -> Option<&FactionTurnState> {
        self.states.get(faction_id)
    }

    /// A faction's current state, mutably. Lets game code queue modifiers or
    /// move territory between cycles.
    pub fn faction_state_mut(&mut self, faction_id: &str) -> Option<&mut FactionTurnState> {
        self.states.get_mut(faction_id)
    }

    /// A faction's current level.
    pub fn faction_level(&self, faction_id: &str) -> Option<u32> {
        let state = self.states.get(faction_id)?;
        let points = state
            .territory
            .compute_points(&self.rules.territory_point_values);
        Some(self.rules.level_for_points(points))
    }

    /// How many actions a faction rolls per cycle at its current level.
    pub fn actions_per_turn(&self, faction_id: &str) -> Option<usize> {
        self.faction_level(faction_id)
            .map(|level| self.rules.actions_for_level(level))
    }

    /// The party state, if attached.
    pub fn party_state(&self) -> Option<&PartyFactionState> {
        self.party.as_ref()
    }

    /// The party state, mutably.
    pub fn party_state_mut(&mut self) -> Option<&mut PartyFactionState> {
        self.party.as_mut()
    }

    /// Attach or detach party state.
    pub fn set_party_state(&mut self, party: Option<PartyFactionState>) {
        self.party = party;
    }

    /// Have the party work for a faction, rolling against their standing.
    pub fn perform_faction_work(&mut self, work: &FactionWork) -> EngineResult<FactionWorkResult> {
        if !self.definitions.contains_key(&work.faction_id) {
            return Err(EngineError::UnknownFaction(work.faction_id.clone()));
        }
        let party = self.party.as_mut().ok_or(EngineError::NoPartyState)?;
        Ok(perform_faction_work(
            work,
            party,
            self.oracle.as_mut(),
            &mut *self.dice,
            &self.rules,
            self.clock.current_date(),
        ))
    }

    /// Capture the full mutable state.
    pub fn to_snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            days_accumulated: self.clock.days_accumulated(),
            cycles_completed: self.clock.cycles_completed(),
            current_date: self.clock.current_date().to_string(),
            calendar: self.clock.calendar(),
            faction_states: self.states.clone(),
            party_state: self.party.clone(),
            global_flags: self.effects.flags().clone(),
            oracle_state: self.oracle.as_ref().map(FactionOracle::state),
            dice: self.dice.state(),
        }
    }

    /// Replace the mutable state with a snapshot. Content and callbacks are
    /// kept; pending rumors are discarded.
    #[allow(clippy::wrong_self_convention)]
    pub fn from_snapshot(&mut self, snapshot: EngineSnapshot) {
        self.clock = FactionClock::from_parts(
            snapshot.days_accumulated,
            snapshot.cycles_completed,
            snapshot.current_date,
            snapshot.calendar,
        );
        self.states = snapshot.faction_states;
        self.party = snapshot.party_state;
        self.effects = EffectsInterpreter::new();
        self.effects.set_flags(snapshot.global_flags);
        if let (Some(oracle), Some(state)) = (self.oracle.as_mut(), snapshot.oracle_state) {
            oracle.restore_state(state);
        }
        self.dice.restore(snapshot.dice);
        debug!(
            cycles = self.clock.cycles_completed(),
            factions = self.states.len(),
            "restored snapshot"
        );
    }
}

/// Fresh turn states for every definition.
fn init_states(
    rules: &FactionRules,
    definitions: &BTreeMap<String, FactionDefinition>,
    date: &str,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, FactionTurnState> {
    let mut states = BTreeMap::new();
    for (id, definition) in definitions {
        let mut state = FactionTurnState::new(id.clone());
        if let Some(home) = &definition.home_territory {
            state.territory = Territory::from_home(home, &rules.territory_point_values);
        }

        for template in &definition.action_library {
            if let Some(goal_id) = &template.goal_id
                && definition.goal(goal_id).is_none()
            {
                let message = format!(
                    "{id}: action {} references missing goal {goal_id}",
                    template.action_id
                );
                warn!("{message}");
                warnings.push(message);
            }
        }

        for action_id in definition
            .starting_actions
            .iter()
            .take(rules.actions_per_faction)
        {
            let Some(template) = definition.action_template(action_id) else {
                let message = format!("{id}: starting action {action_id} is not in the library");
                warn!("{message}");
                warnings.push(message);
                continue;
            };
            let segments = template
                .segments
                .unwrap_or_else(|| rules.default_segments(template.scope));
            state.active_actions.push(ActionInstance::new(
                action_id.clone(),
                template.goal_id.clone(),
                segments,
                date,
            ));
        }

        states.insert(id.clone(), state);
    }
    states
}
