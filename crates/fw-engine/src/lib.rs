//! Turn engine for the Factionweave faction simulation.
//!
//! Drives every faction's actions forward in fixed-cadence cycles, applies
//! completion effects, resolves contested territory through the oracle, and
//! exposes snapshots, status views and party-facing hooks. All randomness
//! comes from the engine's single [`fw_core::DiceSource`].

/// Day accumulator and cycle counter.
pub mod clock;
/// Configuration types for engine runs.
pub mod config;
/// Effects interpreter and the contested-claim context.
pub mod effects;
/// The top-level engine.
pub mod engine;
/// Error types for the engine crate.
pub mod error;
/// Standing price modifiers and map location lookups.
pub mod hooks;
/// Party work for factions.
pub mod party;
/// Scenario files.
pub mod scenario;
/// Serializable engine state.
pub mod snapshot;
/// Status views for presentation layers.
pub mod status;
/// Per-faction turn resolution and cycle results.
pub mod turn;

/// Re-export of [`clock::FactionClock`].
pub use clock::FactionClock;
/// Re-export of [`config::EngineConfig`].
pub use config::EngineConfig;
/// Re-exports of [`effects::EffectResult`] and [`effects::EffectsInterpreter`].
pub use effects::{EffectResult, EffectsInterpreter};
/// Re-exports of [`engine::CycleCallback`] and [`engine::FactionEngine`].
pub use engine::{CycleCallback, FactionEngine};
/// Re-exports of [`error::EngineError`] and [`error::EngineResult`].
pub use error::{EngineError, EngineResult};
/// Re-exports of the hook types.
pub use hooks::{HexFactionLookup, StandingModifiers, apply_cost_modifier};
/// Re-exports of [`party::FactionWork`] and [`party::FactionWorkResult`].
pub use party::{FactionWork, FactionWorkResult};
/// Re-export of [`scenario::Scenario`].
pub use scenario::Scenario;
/// Re-export of [`snapshot::EngineSnapshot`].
pub use snapshot::EngineSnapshot;
/// Re-exports of the status view types.
pub use status::{FactionStatus, PartySummary};
/// Re-exports of the cycle result types.
pub use turn::{ActionRollResult, CycleResult, FactionCycleResult};
