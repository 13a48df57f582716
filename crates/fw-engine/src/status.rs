//! Read-only status views for presentation layers.

use serde::{Deserialize, Serialize};

use fw_core::party::{JobStatus, PartyAffiliation};
use fw_core::{StandingTier, TerritoryKind};

use crate::engine::FactionEngine;

/// Progress of one active action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
    /// Action id.
    pub action_id: String,
    /// Segments filled.
    pub progress: u32,
    /// Segments needed.
    pub segments: u32,
    /// Whether progress has reached the segment count.
    pub complete: bool,
}

/// Held asset counts by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryCounts {
    /// Hexes held.
    pub hexes: usize,
    /// Settlements held.
    pub settlements: usize,
    /// Strongholds held.
    pub strongholds: usize,
    /// Domains held.
    pub domains: usize,
}

/// Summary of one faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionStatus {
    /// Faction id.
    pub faction_id: String,
    /// Display name.
    pub name: String,
    /// Current level.
    pub level: u32,
    /// Current territory points.
    pub territory_points: u32,
    /// Active actions, in roll order.
    pub actions: Vec<ActionStatus>,
    /// Held asset counts.
    pub territory: TerritoryCounts,
    /// Most recent news lines, oldest first.
    pub recent_news: Vec<String>,
}

/// Party standing with one faction or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    /// Faction or group id.
    pub faction_id: String,
    /// Raw standing.
    pub standing: i32,
    /// Qualitative tier.
    pub tier: StandingTier,
}

impl StandingEntry {
    /// The tier's display label.
    pub fn label(&self) -> &'static str {
        self.tier.label()
    }
}

/// A job in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Job id.
    pub job_id: String,
    /// Faction offering the job.
    pub faction_id: String,
    /// Job title.
    pub title: String,
    /// Job status.
    pub status: JobStatus,
}

/// Summary of the party's standing with every faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySummary {
    /// Standings, sorted by id.
    pub standings: Vec<StandingEntry>,
    /// Formal ties.
    pub affiliations: Vec<PartyAffiliation>,
    /// Jobs still in progress.
    pub active_jobs: Vec<JobSummary>,
    /// Number of finished jobs.
    pub completed_jobs: usize,
}

impl FactionEngine {
    /// Status of one faction, or `None` for an unknown id.
    pub fn faction_status(&self, faction_id: &str) -> Option<FactionStatus> {
        let state = self.faction_state(faction_id)?;
        let name = self
            .definition(faction_id)
            .map_or_else(|| faction_id.to_string(), |d| d.name.clone());
        let territory_points = state
            .territory
            .compute_points(&self.rules().territory_point_values);

        Some(FactionStatus {
            faction_id: faction_id.to_string(),
            name,
            level: self.rules().level_for_points(territory_points),
            territory_points,
            actions: state
                .active_actions
                .iter()
                .map(|a| ActionStatus {
                    action_id: a.action_id.clone(),
                    progress: a.progress,
                    segments: a.segments,
                    complete: a.is_complete(),
                })
                .collect(),
            territory: TerritoryCounts {
                hexes: state.territory.count(TerritoryKind::Hex),
                settlements: state.territory.count(TerritoryKind::Settlement),
                strongholds: state.territory.count(TerritoryKind::Stronghold),
                domains: state.territory.count(TerritoryKind::Domain),
            },
            recent_news: state.recent_news(self.config().news_in_status).to_vec(),
        })
    }

    /// Status of every faction, in id order.
    pub fn all_factions_summary(&self) -> Vec<FactionStatus> {
        self.faction_states()
            .keys()
            .filter_map(|id| self.faction_status(id))
            .collect()
    }

    /// Party summary, or `None` when no party state is attached.
    pub fn party_summary(&self) -> Option<PartySummary> {
        let party = self.party_state()?;
        Some(PartySummary {
            standings: party
                .standing_by_id
                .iter()
                .map(|(id, &standing)| StandingEntry {
                    faction_id: id.clone(),
                    standing,
                    tier: StandingTier::for_standing(standing),
                })
                .collect(),
            affiliations: party.affiliations.clone(),
            active_jobs: party
                .jobs_in_progress()
                .map(|job| JobSummary {
                    job_id: job.job_id.clone(),
                    faction_id: job.faction_id.clone(),
                    title: job.title.clone(),
                    status: job.status,
                })
                .collect(),
            completed_jobs: party.completed_job_ids.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::EngineConfig;
    use fw_core::party::{ActiveJob, AffiliationKind};
    use fw_core::{FactionDefinition, FactionRules, PartyFactionState};

    fn engine() -> FactionEngine {
        let defs: Vec<FactionDefinition> = serde_json::from_str(
            r#"[
                {
                    "faction_id": "crown",
                    "name": "The Iron Crown",
                    "home_territory": {
                        "hexes": ["0101", "0102"],
                        "settlements": ["ford"],
                        "strongholds": [{ "id": "keep" }]
                    },
                    "action_library": [
                        { "action_id": "patrol", "name": "Patrol", "scope": "task" },
                        { "action_id": "annex", "name": "Annex" }
                    ],
                    "starting_actions": ["patrol", "annex"]
                },
                { "faction_id": "guild", "name": "Merchant Guild" }
            ]"#,
        )
        .unwrap();
        let defs: BTreeMap<_, _> = defs.into_iter().map(|d| (d.faction_id.clone(), d)).collect();
        FactionEngine::new(
            FactionRules::default(),
            defs,
            EngineConfig::default().with_news_in_status(2),
        )
    }

    #[test]
    fn faction_status_summarizes_state() {
        let mut engine = engine();
        engine
            .faction_state_mut("crown")
            .unwrap()
            .news
            .extend(["one".to_string(), "two".to_string(), "three".to_string()]);

        let status = engine.faction_status("crown").unwrap();
        assert_eq!(status.name, "The Iron Crown");
        assert_eq!(status.territory_points, 7);
        assert_eq!(status.level, 3);
        assert_eq!(
            status.territory,
            TerritoryCounts {
                hexes: 2,
                settlements: 1,
                strongholds: 1,
                domains: 0
            }
        );
        assert_eq!(status.actions.len(), 2);
        assert_eq!(status.actions[0].segments, 4);
        assert!(!status.actions[0].complete);
        assert_eq!(status.recent_news, vec!["two", "three"]);
        assert!(engine.faction_status("nobody").is_none());
    }

    #[test]
    fn all_factions_in_id_order() {
        let ids: Vec<_> = engine()
            .all_factions_summary()
            .into_iter()
            .map(|s| s.faction_id)
            .collect();
        assert_eq!(ids, vec!["crown", "guild"]);
    }

    #[test]
    fn party_summary_needs_party() {
        let mut engine = engine();
        assert!(engine.party_summary().is_none());

        let mut party = PartyFactionState::default();
        party.adjust_standing("guild", 6, -100, 100);
        party.adjust_standing("crown", -3, -100, 100);
        party.affiliations.push(PartyAffiliation {
            faction_or_group: "guild".into(),
            kind: AffiliationKind::WorkingRelationship,
            rank: 1,
            since_date: None,
        });
        party.active_jobs.insert(
            "job-1".into(),
            ActiveJob {
                job_id: "job-1".into(),
                faction_id: "guild".into(),
                template_id: "escort".into(),
                title: "Escort the caravan".into(),
                accepted_on: "1420-05-01".into(),
                status: JobStatus::Active,
                notes: String::new(),
            },
        );
        party.completed_job_ids.push("job-0".into());
        engine.set_party_state(Some(party));

        let summary = engine.party_summary().unwrap();
        let standings: Vec<_> = summary
            .standings
            .iter()
            .map(|s| (s.faction_id.as_str(), s.standing, s.label()))
            .collect();
        assert_eq!(
            standings,
            vec![("crown", -3, "Unfavorable"), ("guild", 6, "Friendly")]
        );
        assert_eq!(summary.affiliations.len(), 1);
        assert_eq!(summary.active_jobs[0].title, "Escort the caravan");
        assert_eq!(summary.completed_jobs, 1);
    }
}
