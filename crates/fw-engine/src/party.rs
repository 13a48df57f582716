//! Party work for factions.
//!
//! The party spends days on a task for a faction and rolls 2d6 against a
//! threshold set by their current standing. Success raises standing, a bad
//! failure lowers it, and the extreme rolls (2 and 12) may draw an oracle
//! twist.

use serde::{Deserialize, Serialize};
use tracing::debug;

use fw_core::{DiceSource, Die, FactionRules, PartyFactionState};
use fw_oracle::{FactionOracle, OracleEvent};

/// Oracle tag for a twist on a natural 12.
pub const EXCEPTIONAL_TAG: &str = "party_work_exceptional";
/// Oracle tag for a twist on a natural 2.
pub const CATASTROPHE_TAG: &str = "party_work_catastrophe";

/// A stretch of work the party does for a faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionWork {
    /// Faction the work is for.
    pub faction_id: String,
    /// Days spent.
    pub days: u32,
    /// Kind of work, e.g. `courier` or `guard`.
    pub task_type: String,
}

impl FactionWork {
    /// Describe a stretch of work.
    pub fn new(faction_id: impl Into<String>, days: u32, task_type: impl Into<String>) -> Self {
        Self {
            faction_id: faction_id.into(),
            days,
            task_type: task_type.into(),
        }
    }
}

/// Outcome of a stretch of faction work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionWorkResult {
    /// Whether the roll met the threshold.
    pub success: bool,
    /// Faction worked for.
    pub faction_id: String,
    /// 2d6 total.
    pub roll: u32,
    /// Total needed.
    pub threshold: u32,
    /// Standing before the work.
    pub standing_before: i32,
    /// Standing after the work.
    pub standing_after: i32,
    /// Applied change (after clamping).
    pub standing_delta: i32,
    /// Summary line.
    pub message: String,
    /// Oracle twist on an extreme roll.
    #[serde(default)]
    pub oracle_twist: Option<OracleEvent>,
}

/// 2d6 total needed for faction work at a standing.
pub fn work_threshold(standing: i32) -> u32 {
    match standing {
        s if s >= 5 => 6,
        s if s < 0 => 8,
        _ => 7,
    }
}

/// Resolve a stretch of faction work.
///
/// Two d6 draws come first; a twist, when one is rolled, draws after them.
pub fn perform_faction_work(
    work: &FactionWork,
    party: &mut PartyFactionState,
    oracle: Option<&mut FactionOracle>,
    dice: &mut dyn DiceSource,
    rules: &FactionRules,
    date: &str,
) -> FactionWorkResult {
    let roll = dice.roll(Die::D6) + dice.roll(Die::D6);
    let standing_before = party.standing(&work.faction_id);
    let threshold = work_threshold(standing_before);
    let success = roll >= threshold;

    let oracle_twist = match oracle {
        Some(oracle) if (roll == 2 || roll == 12) && oracle.config().party_work_twists() => {
            let tag = if roll == 12 { EXCEPTIONAL_TAG } else { CATASTROPHE_TAG };
            Some(oracle.detail_check(dice, date, Some(work.faction_id.as_str()), tag))
        }
        _ => None,
    };

    let mut delta = 0;
    if success {
        delta += if work.days >= 7 { 2 } else { 1 };
        if roll >= 10 {
            delta += 1;
        }
        if roll == 12 {
            delta += 1;
        }
    } else {
        if roll <= 4 {
            delta -= 1;
        }
        if roll == 2 {
            delta -= 1;
        }
    }

    let (_, standing_after) = party.adjust_standing(
        &work.faction_id,
        delta,
        rules.standing_min,
        rules.standing_max,
    );

    let mut message = if success {
        format!(
            "Successfully completed {} work for {}.",
            work.task_type, work.faction_id
        )
    } else {
        format!(
            "Failed to complete {} work for {}.",
            work.task_type, work.faction_id
        )
    };
    if let Some(twist) = &oracle_twist {
        message.push_str(&format!(" Twist: {}", twist.meaning_pair()));
    }

    debug!(
        faction = %work.faction_id,
        roll,
        threshold,
        standing_before,
        standing_after,
        "faction work"
    );

    FactionWorkResult {
        success,
        faction_id: work.faction_id.clone(),
        roll,
        threshold,
        standing_before,
        standing_after,
        standing_delta: standing_after - standing_before,
        message,
        oracle_twist,
    }
}
