//! Scenario files: everything needed to build an engine, in one JSON document.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fw_core::{
    FactionDefinition, FactionRules, GroupRule, PartyFactionState, Relation, RelationshipResolver,
};
use fw_oracle::{FactionOracle, FactionOracleConfig};

use crate::config::EngineConfig;
use crate::engine::FactionEngine;
use crate::error::{EngineError, EngineResult};

/// Rules, content and optional party state for one campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Simulation rules.
    pub rules: FactionRules,
    /// Oracle settings; no oracle is attached when absent.
    pub oracle: Option<FactionOracleConfig>,
    /// Faction definitions.
    pub factions: Vec<FactionDefinition>,
    /// Pairwise relations.
    pub relations: Vec<Relation>,
    /// Relationship groups.
    pub groups: Vec<GroupRule>,
    /// Party state at the start of play.
    pub party: Option<PartyFactionState>,
    /// Calendar date play starts on.
    pub start_date: Option<NaiveDate>,
}

impl Scenario {
    /// Parse a scenario from JSON.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scenario file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Definitions keyed by faction id. A later duplicate replaces an earlier one.
    pub fn definitions(&self) -> BTreeMap<String, FactionDefinition> {
        self.factions
            .iter()
            .map(|def| (def.faction_id.clone(), def.clone()))
            .collect()
    }

    /// Index the scenario's relations and groups.
    pub fn relationship_resolver(&self) -> RelationshipResolver {
        RelationshipResolver::new(
            self.relations.clone(),
            self.groups.clone(),
            &self.definitions(),
        )
    }

    /// Build an engine with relations, oracle and party state attached.
    ///
    /// The scenario's start date applies unless `config` already sets one.
    pub fn build_engine(&self, mut config: EngineConfig) -> FactionEngine {
        if config.start_date.is_none() {
            config.start_date = self.start_date;
        }
        let definitions = self.definitions();
        let relations =
            RelationshipResolver::new(self.relations.clone(), self.groups.clone(), &definitions);
        let mut engine =
            FactionEngine::new(self.rules.clone(), definitions, config).with_relations(relations);
        if let Some(oracle) = &self.oracle {
            engine = engine.with_oracle(FactionOracle::new(oracle.clone()));
        }
        if let Some(party) = &self.party {
            engine = engine.with_party(party.clone());
        }
        engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "rules": { "turn_cadence_days": 10 },
        "oracle": { "default_chaos_factor": 6 },
        "factions": [
            {
                "faction_id": "crown",
                "name": "The Iron Crown",
                "tags": ["noble"],
                "home_territory": { "hexes": ["0604"] },
                "action_library": [{ "action_id": "patrol", "name": "Patrol" }],
                "starting_actions": ["patrol"]
            },
            { "faction_id": "guild", "name": "Merchant Guild", "tags": ["trade"] }
        ],
        "relations": [{ "a": "nobles", "b": "guild", "score": -30 }],
        "groups": [{ "group_id": "nobles", "match_tags_any": ["noble"] }],
        "party": { "standing_by_id": { "guild": 3 } },
        "start_date": "1420-05-01"
    }"#;

    #[test]
    fn empty_scenario_uses_defaults() {
        let scenario = Scenario::from_json("{}").unwrap();
        assert_eq!(scenario.rules, FactionRules::default());
        assert!(scenario.oracle.is_none());
        assert!(scenario.factions.is_empty());
        assert!(scenario.relations.is_empty());
    }

    #[test]
    fn build_engine_attaches_everything() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        let engine = scenario.build_engine(EngineConfig::default());

        assert_eq!(engine.rules().turn_cadence_days, 10);
        assert_eq!(engine.oracle().map(FactionOracle::chaos_factor), Some(6));
        assert_eq!(engine.party_state().map(|p| p.standing("guild")), Some(3));
        assert_eq!(engine.faction_states().len(), 2);
        assert_eq!(
            engine.relations().map(|r| r.get_score("crown", "guild")),
            Some(-30)
        );
        assert!(engine.warnings().is_empty());
        assert_eq!(engine.current_date(), "1420-05-01");
    }

    #[test]
    fn config_start_date_wins() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        let date = NaiveDate::from_ymd_opt(1421, 1, 1).unwrap();
        let engine = scenario.build_engine(EngineConfig::default().with_start_date(date));
        assert_eq!(engine.current_date(), "1421-01-01");
    }

    #[test]
    fn resolver_without_relations() {
        let scenario = Scenario::from_json(r#"{ "factions": [] }"#).unwrap();
        let resolver = scenario.relationship_resolver();
        assert!(resolver.relations().is_empty());
        assert_eq!(resolver.get_score("a", "b"), 0);
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Scenario::load(&missing),
            Err(EngineError::Io { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ \"factions\": 3 }").unwrap();
        assert!(matches!(Scenario::load(&bad), Err(EngineError::Json(_))));
    }
}
