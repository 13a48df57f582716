//! Hooks for game systems outside the faction engine.
//!
//! Standing changes prices and encounter odds, and map locations resolve to
//! the faction holding them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fw_core::{FactionTurnState, PartyFactionState, StandingTier, TerritoryKind};

use crate::engine::FactionEngine;

/// Price and encounter adjustments for a standing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingModifiers {
    /// Price multiplier as a percentage (100 = list price).
    pub cost_percent: u32,
    /// Added to encounter reaction rolls.
    pub encounter_modifier: i32,
    /// The standing's tier.
    pub tier: StandingTier,
}

impl StandingModifiers {
    /// Modifiers for a raw standing value.
    pub fn for_standing(standing: i32) -> Self {
        let tier = StandingTier::for_standing(standing);
        let (cost_percent, encounter_modifier) = match tier {
            StandingTier::Allied => (75, -2),
            StandingTier::Friendly => (85, -1),
            StandingTier::Favorable => (95, 0),
            StandingTier::Neutral => (100, 0),
            StandingTier::Unfavorable => (110, 1),
            StandingTier::Hostile => (125, 1),
            StandingTier::Enemy => (150, 2),
        };
        Self {
            cost_percent,
            encounter_modifier,
            tier,
        }
    }

    /// The price multiplier as a fraction.
    pub fn cost_multiplier(&self) -> f64 {
        f64::from(self.cost_percent) / 100.0
    }
}

/// Adjust a base price for standing.
///
/// The scaled price is truncated, then rounded half-up to a multiple of
/// `round_to` when that is above 1. Never less than 1.
pub fn apply_cost_modifier(base: u32, standing: i32, round_to: u32) -> u32 {
    let percent = u64::from(StandingModifiers::for_standing(standing).cost_percent);
    let mut cost = u64::from(base) * percent / 100;
    if round_to > 1 {
        let step = u64::from(round_to);
        cost = (cost + step / 2) / step * step;
    }
    u32::try_from(cost.max(1)).unwrap_or(u32::MAX)
}

/// Which faction holds each hex and settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexFactionLookup {
    hexes: BTreeMap<String, String>,
    settlements: BTreeMap<String, String>,
}

impl HexFactionLookup {
    /// Build from the engine's current faction states.
    pub fn build(engine: &FactionEngine) -> Self {
        Self::from_states(engine.faction_states())
    }

    /// Build from faction states. When two factions hold the same id, the
    /// first in id order wins.
    pub fn from_states(states: &BTreeMap<String, FactionTurnState>) -> Self {
        let mut lookup = Self::default();
        for (faction_id, state) in states {
            for hex in state.territory.set(TerritoryKind::Hex) {
                lookup
                    .hexes
                    .entry(hex.clone())
                    .or_insert_with(|| faction_id.clone());
            }
            for settlement in state.territory.set(TerritoryKind::Settlement) {
                lookup
                    .settlements
                    .entry(settlement.clone())
                    .or_insert_with(|| faction_id.clone());
            }
        }
        lookup
    }

    /// The faction holding a hex.
    pub fn faction_for_hex(&self, hex: &str) -> Option<&str> {
        self.hexes.get(hex).map(String::as_str)
    }

    /// The faction holding a settlement.
    pub fn faction_for_settlement(&self, settlement: &str) -> Option<&str> {
        self.settlements.get(settlement).map(String::as_str)
    }

    /// Party standing with the faction holding a hex.
    pub fn standing_for_hex(&self, hex: &str, party: Option<&PartyFactionState>) -> Option<i32> {
        let faction = self.faction_for_hex(hex)?;
        party.map(|p| p.standing(faction))
    }

    /// Party standing with the faction holding a settlement.
    pub fn standing_for_settlement(
        &self,
        settlement: &str,
        party: Option<&PartyFactionState>,
    ) -> Option<i32> {
        let faction = self.faction_for_settlement(settlement)?;
        party.map(|p| p.standing(faction))
    }

    /// Number of claimed hexes.
    pub fn hex_count(&self) -> usize {
        self.hexes.len()
    }
}
