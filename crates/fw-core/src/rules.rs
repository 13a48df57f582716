//! Faction rules configuration.
//!
//! Loaded once from content and never mutated. Every field has a default so
//! partially specified rules files still produce a working engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::definition::ActionScope;
use crate::dice::Die;
use crate::territory::TerritoryPointValues;

/// Rules governing faction turns, progress, and levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactionRules {
    /// Content schema version, informational only.
    pub schema_version: u32,
    /// Days of accumulated game time per faction cycle.
    pub turn_cadence_days: u32,
    /// Highest level a faction can reach.
    pub max_faction_level: u32,
    /// Maximum number of concurrently active actions per faction.
    pub actions_per_faction: usize,
    /// Die tag used for progress rolls.
    pub die: String,
    /// Absolute cap on the summed per-action modifier.
    pub roll_mod_cap: i32,
    /// Progress gained on a modified total of 4 or 5.
    pub advance_on_4_5: u32,
    /// Progress gained on a modified total of 6 or more.
    pub advance_on_6_plus: u32,
    /// Raw rolls that flag a complication.
    pub complication_on_rolls: Vec<u32>,
    /// Default segments for `task` actions.
    pub default_segments_task: u32,
    /// Default segments for `mission` (and other) actions.
    pub default_segments_mission: u32,
    /// Default segments for `goal` actions.
    pub default_segments_goal: u32,
    /// Level -> minimum territory points.
    pub territory_points_to_level: BTreeMap<u32, u32>,
    /// Level -> actions rolled per cycle.
    pub actions_per_turn_by_level: BTreeMap<u32, usize>,
    /// Weight of each territory kind.
    pub territory_point_values: TerritoryPointValues,
    /// Lowest party standing the effect layer allows.
    pub standing_min: i32,
    /// Highest party standing the effect layer allows.
    pub standing_max: i32,
}

impl Default for FactionRules {
    fn default() -> Self {
        Self {
            schema_version: 1,
            turn_cadence_days: 7,
            max_faction_level: 4,
            actions_per_faction: 3,
            die: "d6".to_string(),
            roll_mod_cap: 1,
            advance_on_4_5: 1,
            advance_on_6_plus: 2,
            complication_on_rolls: vec![1],
            default_segments_task: 4,
            default_segments_mission: 8,
            default_segments_goal: 12,
            territory_points_to_level: BTreeMap::from([(1, 0), (2, 2), (3, 5), (4, 9)]),
            actions_per_turn_by_level: BTreeMap::from([(1, 1), (2, 1), (3, 2), (4, 2)]),
            territory_point_values: TerritoryPointValues::default(),
            standing_min: -100,
            standing_max: 100,
        }
    }
}

impl FactionRules {
    /// Cadence in days, never less than 1.
    pub fn cadence(&self) -> u32 {
        self.turn_cadence_days.max(1)
    }

    /// The progress die, falling back to a d6 when the tag is invalid.
    pub fn die(&self) -> Die {
        Die::parse(&self.die).unwrap_or(Die::D6)
    }

    /// Default segment count for an action scope.
    pub fn default_segments(&self, scope: ActionScope) -> u32 {
        match scope {
            ActionScope::Task => self.default_segments_task,
            ActionScope::Goal => self.default_segments_goal,
            ActionScope::Mission | ActionScope::Operation | ActionScope::Diplomacy => {
                self.default_segments_mission
            }
        }
    }

    /// The highest level whose threshold does not exceed `points`, capped at
    /// the maximum level. Level 1 if no threshold matches.
    pub fn level_for_points(&self, points: u32) -> u32 {
        let level = self
            .territory_points_to_level
            .iter()
            .filter(|&(_, &threshold)| points >= threshold)
            .map(|(&level, _)| level)
            .max()
            .unwrap_or(1);
        level.min(self.max_faction_level.max(1))
    }

    /// Actions a faction of `level` rolls per cycle (1 if unlisted).
    pub fn actions_for_level(&self, level: u32) -> usize {
        self.actions_per_turn_by_level
            .get(&level)
            .copied()
            .unwrap_or(1)
    }

    /// Clamp a summed modifier into `[-cap, +cap]`.
    pub fn clamp_modifier(&self, modifier: i32) -> i32 {
        let cap = self.roll_mod_cap.abs();
        modifier.clamp(-cap, cap)
    }

    /// Progress delta for a modified roll total.
    pub fn progress_delta(&self, total: i32) -> u32 {
        if total >= 6 {
            self.advance_on_6_plus
        } else if total >= 4 {
            self.advance_on_4_5
        } else {
            0
        }
    }

    /// Whether a raw, unmodified roll flags a complication.
    pub fn is_complication(&self, raw_roll: u32) -> bool {
        self.complication_on_rolls.contains(&raw_roll)
    }

    /// Clamp a standing value into the configured range.
    pub fn clamp_standing(&self, standing: i32) -> i32 {
        let (lo, hi) = if self.standing_min <= self.standing_max {
            (self.standing_min, self.standing_max)
        } else {
            (self.standing_max, self.standing_min)
        };
        standing.clamp(lo, hi)
    }

    /// Check the rules for questionable values. Never fails; each problem is
    /// reported as a warning and a documented fallback applies.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.turn_cadence_days == 0 {
            warnings.push("turn_cadence_days is 0; treating it as 1".to_string());
        }
        if Die::parse(&self.die).is_err() {
            warnings.push(format!("unknown die '{}'; using d6", self.die));
        }
        let thresholds: Vec<u32> = self.territory_points_to_level.values().copied().collect();
        if thresholds.windows(2).any(|w| w[1] < w[0]) {
            warnings.push("territory_points_to_level is not monotonic".to_string());
        }
        for level in self.territory_points_to_level.keys() {
            if !self.actions_per_turn_by_level.contains_key(level) {
                warnings.push(format!(
                    "level {level} has no entry in actions_per_turn_by_level; using 1"
                ));
            }
        }
        if self.standing_min > self.standing_max {
            warnings.push("standing_min is greater than standing_max".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_match_weekly_d6() {
        let rules = FactionRules::default();
        assert_eq!(rules.cadence(), 7);
        assert_eq!(rules.die(), Die::D6);
        assert_eq!(rules.complication_on_rolls, vec![1]);
        assert!(rules.validate().is_empty());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let rules: FactionRules =
            serde_json::from_str(r#"{ "turn_cadence_days": 10, "die": "d8" }"#).unwrap();
        assert_eq!(rules.cadence(), 10);
        assert_eq!(rules.die(), Die::D8);
        assert_eq!(rules.advance_on_6_plus, 2);
        assert_eq!(rules.actions_for_level(3), 2);
    }

    #[test]
    fn level_thresholds() {
        let rules = FactionRules::default();
        assert_eq!(rules.level_for_points(0), 1);
        assert_eq!(rules.level_for_points(1), 1);
        assert_eq!(rules.level_for_points(2), 2);
        assert_eq!(rules.level_for_points(5), 3);
        assert_eq!(rules.level_for_points(9), 4);
        assert_eq!(rules.level_for_points(100), 4);
    }

    #[test]
    fn level_capped_by_max_level() {
        let rules = FactionRules {
            max_faction_level: 2,
            ..FactionRules::default()
        };
        assert_eq!(rules.level_for_points(50), 2);
    }

    #[test]
    fn default_segments_by_scope() {
        let rules = FactionRules::default();
        assert_eq!(rules.default_segments(ActionScope::Task), 4);
        assert_eq!(rules.default_segments(ActionScope::Mission), 8);
        assert_eq!(rules.default_segments(ActionScope::Goal), 12);
        assert_eq!(rules.default_segments(ActionScope::Diplomacy), 8);
    }

    #[test]
    fn progress_delta_table() {
        let rules = FactionRules::default();
        assert_eq!(rules.progress_delta(1), 0);
        assert_eq!(rules.progress_delta(3), 0);
        assert_eq!(rules.progress_delta(4), 1);
        assert_eq!(rules.progress_delta(5), 1);
        assert_eq!(rules.progress_delta(6), 2);
        assert_eq!(rules.progress_delta(7), 2);
    }

    #[test]
    fn unknown_level_gets_one_action() {
        let rules = FactionRules::default();
        assert_eq!(rules.actions_for_level(9), 1);
    }

    #[test]
    fn validate_reports_problems() {
        let rules = FactionRules {
            turn_cadence_days: 0,
            die: "coin".to_string(),
            territory_points_to_level: BTreeMap::from([(1, 0), (2, 5), (3, 3)]),
            ..FactionRules::default()
        };
        let warnings = rules.validate();
        assert_eq!(warnings.len(), 3, "{warnings:?}");
        assert_eq!(rules.cadence(), 1);
        assert_eq!(rules.die(), Die::D6);
    }

    #[test]
    fn standing_clamp() {
        let rules = FactionRules::default();
        assert_eq!(rules.clamp_standing(150), 100);
        assert_eq!(rules.clamp_standing(-150), -100);
        assert_eq!(rules.clamp_standing(12), 12);
    }

    proptest! {
        #[test]
        fn modifier_always_within_cap(m in -50i32..50, cap in 0i32..5) {
            let rules = FactionRules { roll_mod_cap: cap, ..FactionRules::default() };
            let clamped = rules.clamp_modifier(m);
            prop_assert!(clamped.abs() <= cap);
        }

        #[test]
        fn level_is_monotonic_in_points(a in 0u32..40, b in 0u32..40) {
            let rules = FactionRules::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rules.level_for_points(lo) <= rules.level_for_points(hi));
        }
    }
}
