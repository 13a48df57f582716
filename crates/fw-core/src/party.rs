//! The party's standing, affiliations, and jobs with factions.
//!
//! Primary ownership sits with the party-facing layer; the faction engine
//! only writes standing through effects and reads everything for summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of formal tie between the party and a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffiliationKind {
    /// Sworn service to a lord.
    Fealty,
    /// A binding oath.
    Oath,
    /// Informal, contract-based work.
    #[default]
    WorkingRelationship,
    /// Blessing of a cult or deity.
    CultBlessing,
}

/// A formal tie between the party and a faction or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyAffiliation {
    /// Faction or group id.
    pub faction_or_group: String,
    /// Kind of tie.
    #[serde(default)]
    pub kind: AffiliationKind,
    /// Rank within the faction.
    #[serde(default)]
    pub rank: u32,
    /// Date the affiliation began.
    #[serde(default)]
    pub since_date: Option<String>,
}

/// Lifecycle of a job taken from a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// In progress.
    #[default]
    Active,
    /// Finished successfully.
    Completed,
    /// Attempted and failed.
    Failed,
    /// Given up.
    Abandoned,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
            Self::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// A job the party has taken from a faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveJob {
    /// Unique job id.
    pub job_id: String,
    /// Faction offering the job.
    pub faction_id: String,
    /// Job template id.
    pub template_id: String,
    /// Display title.
    pub title: String,
    /// Date accepted.
    #[serde(default)]
    pub accepted_on: String,
    /// Current status.
    #[serde(default)]
    pub status: JobStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// Qualitative band of a standing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingTier {
    /// Standing below -7.
    Enemy,
    /// Standing -7 to -5.
    Hostile,
    /// Standing -4 to -2.
    Unfavorable,
    /// Standing -1 to 1.
    Neutral,
    /// Standing 2 to 4.
    Favorable,
    /// Standing 5 to 7.
    Friendly,
    /// Standing 8 and above.
    Allied,
}

impl StandingTier {
    /// Band a raw standing value. Unbounded on both ends.
    pub fn for_standing(standing: i32) -> Self {
        match standing {
            s if s >= 8 => Self::Allied,
            s if s >= 5 => Self::Friendly,
            s if s >= 2 => Self::Favorable,
            s if s >= -1 => Self::Neutral,
            s if s >= -4 => Self::Unfavorable,
            s if s >= -7 => Self::Hostile,
            _ => Self::Enemy,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Enemy => "Enemy",
            Self::Hostile => "Hostile",
            Self::Unfavorable => "Unfavorable",
            Self::Neutral => "Neutral",
            Self::Favorable => "Favorable",
            Self::Friendly => "Friendly",
            Self::Allied => "Allied",
        }
    }
}

impl std::fmt::Display for StandingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The party's state with respect to every faction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyFactionState {
    /// Standing by faction or group id.
    pub standing_by_id: BTreeMap<String, i32>,
    /// Formal ties.
    pub affiliations: Vec<PartyAffiliation>,
    /// Jobs by job id.
    pub active_jobs: BTreeMap<String, ActiveJob>,
    /// Ids of finished jobs.
    pub completed_job_ids: Vec<String>,
}

impl PartyFactionState {
    /// Standing with a faction or group (0 if never set).
    pub fn standing(&self, faction_or_group: &str) -> i32 {
        self.standing_by_id
            .get(faction_or_group)
            .copied()
            .unwrap_or(0)
    }

    /// Add `delta` to a standing, clamped to `[min, max]`. Returns `(old, new)`.
    pub fn adjust_standing(
        &mut self,
        faction_or_group: &str,
        delta: i32,
        min: i32,
        max: i32,
    ) -> (i32, i32) {
        let old = self.standing(faction_or_group);
        let new = old.saturating_add(delta).clamp(min.min(max), max.max(min));
        self.standing_by_id
            .insert(faction_or_group.to_string(), new);
        (old, new)
    }

    /// Whether the party holds any affiliation with a faction or group.
    pub fn has_affiliation(&self, faction_or_group: &str) -> bool {
        self.affiliation_for(faction_or_group).is_some()
    }

    /// The party's affiliation with a faction or group, if any.
    pub fn affiliation_for(&self, faction_or_group: &str) -> Option<&PartyAffiliation> {
        self.affiliations
            .iter()
            .find(|a| a.faction_or_group == faction_or_group)
    }

    /// Jobs still in progress, ordered by job id.
    pub fn jobs_in_progress(&self) -> impl Iterator<Item = &ActiveJob> {
        self.active_jobs
            .values()
            .filter(|j| j.status == JobStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_defaults_to_zero() {
        let p = PartyFactionState::default();
        assert_eq!(p.standing("guild"), 0);
    }

    #[test]
    fn adjust_standing_clamps_and_reports() {
        let mut p = PartyFactionState::default();
        assert_eq!(p.adjust_standing("guild", 30, -100, 100), (0, 30));
        assert_eq!(p.adjust_standing("guild", 90, -100, 100), (30, 100));
        assert_eq!(p.adjust_standing("guild", -250, -100, 100), (100, -100));
        assert_eq!(p.standing("guild"), -100);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(StandingTier::for_standing(8), StandingTier::Allied);
        assert_eq!(StandingTier::for_standing(7), StandingTier::Friendly);
        assert_eq!(StandingTier::for_standing(5), StandingTier::Friendly);
        assert_eq!(StandingTier::for_standing(2), StandingTier::Favorable);
        assert_eq!(StandingTier::for_standing(1), StandingTier::Neutral);
        assert_eq!(StandingTier::for_standing(-1), StandingTier::Neutral);
        assert_eq!(StandingTier::for_standing(-2), StandingTier::Unfavorable);
        assert_eq!(StandingTier::for_standing(-5), StandingTier::Hostile);
        assert_eq!(StandingTier::for_standing(-8), StandingTier::Enemy);
        assert_eq!(StandingTier::for_standing(-100), StandingTier::Enemy);
        assert_eq!(StandingTier::for_standing(100), StandingTier::Allied);
    }

    #[test]
    fn affiliation_lookup() {
        let mut p = PartyFactionState::default();
        p.affiliations.push(PartyAffiliation {
            faction_or_group: "temple".into(),
            kind: AffiliationKind::CultBlessing,
            rank: 1,
            since_date: None,
        });
        assert!(p.has_affiliation("temple"));
        assert!(!p.has_affiliation("guild"));
        assert_eq!(p.affiliation_for("temple").map(|a| a.rank), Some(1));
    }

    #[test]
    fn jobs_in_progress_filters_status() {
        let mut p = PartyFactionState::default();
        for (id, status) in [("a", JobStatus::Active), ("b", JobStatus::Failed)] {
            p.active_jobs.insert(
                id.into(),
                ActiveJob {
                    job_id: id.into(),
                    faction_id: "guild".into(),
                    template_id: "escort".into(),
                    title: format!("Job {id}"),
                    accepted_on: String::new(),
                    status,
                    notes: String::new(),
                },
            );
        }
        let titles: Vec<_> = p.jobs_in_progress().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Job a"]);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&AffiliationKind::CultBlessing).unwrap();
        assert_eq!(json, "\"cult_blessing\"");
    }
}
