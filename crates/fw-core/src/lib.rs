//! Core data model for the Factionweave faction simulation.
//!
//! Holds the immutable content types (faction definitions, rules, relations),
//! the mutable per-faction turn state, the party's standing with factions,
//! and the injected dice source every random decision draws from.

pub mod definition;
pub mod dice;
pub mod effect;
pub mod error;
pub mod party;
pub mod relation;
pub mod rules;
pub mod state;
pub mod territory;

pub use definition::{ActionScope, ActionTemplate, FactionDefinition};
pub use dice::{DiceSource, DiceState, Die, ScriptedDice, SeededDice};
pub use effect::EffectCommand;
pub use error::{CoreError, CoreResult};
pub use party::{PartyFactionState, StandingTier};
pub use relation::{GroupRule, Relation, RelationshipResolver};
pub use rules::FactionRules;
pub use state::{ActionInstance, FactionTurnState};
pub use territory::{Territory, TerritoryKind, TerritoryPointValues};
