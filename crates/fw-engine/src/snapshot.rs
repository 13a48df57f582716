//! Full-state snapshots.
//!
//! A snapshot is everything that changes while the engine runs: the clock,
//! every faction's turn state, the party state, process-wide flags, the
//! oracle's chaos state and the position of the dice stream. Content
//! (rules, definitions, relations) is not included; restore into an engine
//! built from the same content.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fw_core::{DiceState, FactionTurnState, PartyFactionState};
use fw_oracle::FactionOracleState;

use crate::error::{EngineError, EngineResult};

/// Serializable engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Days accumulated toward the next cycle.
    pub days_accumulated: u32,
    /// Cycles run so far.
    pub cycles_completed: u64,
    /// Current game date string.
    pub current_date: String,
    /// Calendar date, when the clock follows one.
    #[serde(default)]
    pub calendar: Option<NaiveDate>,
    /// Every faction's turn state, by id.
    pub faction_states: BTreeMap<String, FactionTurnState>,
    /// Party state, if attached.
    #[serde(default)]
    pub party_state: Option<PartyFactionState>,
    /// Process-wide flags.
    #[serde(default)]
    pub global_flags: BTreeMap<String, Value>,
    /// Oracle state, if an oracle is attached.
    #[serde(default)]
    pub oracle_state: Option<FactionOracleState>,
    /// Position of the dice stream.
    pub dice: DiceState,
}

impl EngineSnapshot {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to a JSON file.
    pub fn save(&self, path: &Path) -> EngineResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read from a JSON file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::TerritoryKind;
    use fw_core::state::QueuedModifier;

    fn sample() -> EngineSnapshot {
        let mut crown = FactionTurnState::new("crown");
        crown.territory.insert(TerritoryKind::Hex, "0604");
        crown.modifiers_next_cycle.push(QueuedModifier {
            action_id: "all".into(),
            modifier: 1,
            reason: "festival".into(),
        });
        crown.news.push("[1420-05-08] Bridge rebuilt".into());

        let mut party = PartyFactionState::default();
        party.adjust_standing("crown", 4, -100, 100);

        EngineSnapshot {
            days_accumulated: 3,
            cycles_completed: 9,
            current_date: "1420-05-08".into(),
            calendar: NaiveDate::from_ymd_opt(1420, 5, 8),
            faction_states: BTreeMap::from([("crown".to_string(), crown)]),
            party_state: Some(party),
            global_flags: BTreeMap::from([("war".to_string(), Value::Bool(true))]),
            oracle_state: Some(FactionOracleState::default()),
            dice: DiceState { seed: 42, draws: 117 },
        }
    }

    #[test]
    fn json_round_trip_is_exact() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        assert_eq!(EngineSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        let snapshot = sample();
        snapshot.save(&path).unwrap();
        assert_eq!(EngineSnapshot::load(&path).unwrap(), snapshot);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineSnapshot::load(Path::new("/nonexistent/fw/snapshot.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            EngineSnapshot::from_json("{ \"cycles_completed\": \"many\" }"),
            Err(EngineError::Json(_))
        ));
    }
}
