pub mod check;
pub mod oracle;
pub mod relation;
pub mod simulate;
pub mod status;

use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use fw_engine::{
    EngineConfig, EngineSnapshot, FactionEngine, FactionStatus, PartySummary, Scenario,
};

/// Load a scenario file.
fn load_scenario(path: &Path) -> Result<Scenario, String> {
    Scenario::load(path).map_err(|e| format!("failed to load scenario: {e}"))
}

/// Build an engine from a scenario, optionally resuming a snapshot.
fn build_engine(
    scenario: &Scenario,
    seed: u64,
    snapshot: Option<&Path>,
) -> Result<FactionEngine, String> {
    let mut engine = scenario.build_engine(EngineConfig::default().with_seed(seed));
    if let Some(path) = snapshot {
        let snapshot =
            EngineSnapshot::load(path).map_err(|e| format!("failed to load snapshot: {e}"))?;
        engine.from_snapshot(snapshot);
    }
    Ok(engine)
}

/// Print the one-row-per-faction summary table.
fn print_faction_table(statuses: &[FactionStatus]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Faction", "Name", "Level", "Points", "Hexes", "Settl.", "Strong.", "Domains", "Actions",
    ]);

    for status in statuses {
        let actions = status
            .actions
            .iter()
            .map(|a| format!("{} {}/{}", a.action_id, a.progress, a.segments))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            status.faction_id.clone(),
            status.name.clone(),
            status.level.to_string(),
            status.territory_points.to_string(),
            status.territory.hexes.to_string(),
            status.territory.settlements.to_string(),
            status.territory.strongholds.to_string(),
            status.territory.domains.to_string(),
            actions,
        ]);
    }

    println!("{table}");
}

/// Print the party's standings and jobs.
fn print_party(summary: &PartySummary) {
    println!("  {}", "Party Standing".bold().underline());
    println!();

    if summary.standings.is_empty() {
        println!("  {}", "(no standings)".dimmed());
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Faction", "Standing", "Tier"]);
        for entry in &summary.standings {
            table.add_row(vec![
                entry.faction_id.clone(),
                format!("{:+}", entry.standing),
                entry.label().to_string(),
            ]);
        }
        println!("{table}");
    }

    for affiliation in &summary.affiliations {
        println!(
            "  affiliated: {} (rank {})",
            affiliation.faction_or_group, affiliation.rank
        );
    }
    for job in &summary.active_jobs {
        println!("  job: {} [{}] for {}", job.title, job.status, job.faction_id);
    }
    if summary.completed_jobs > 0 {
        println!("  {} job(s) completed", summary.completed_jobs);
    }
    println!();
}
