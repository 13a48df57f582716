use std::path::Path;

use colored::Colorize;

use fw_engine::{EngineConfig, EngineError, FactionEngine, StandingModifiers};

pub fn run(path: &Path, snapshot: Option<&Path>, faction: Option<&str>) -> Result<(), String> {
    let scenario = super::load_scenario(path)?;
    let engine = super::build_engine(&scenario, EngineConfig::default().seed, snapshot)?;

    match faction {
        Some(id) => show_faction(&engine, id)?,
        None => {
            println!(
                "  {} {}",
                "Factions".bold().underline(),
                format!("(cycle {})", engine.clock().cycles_completed()).dimmed()
            );
            println!();
            super::print_faction_table(&engine.all_factions_summary());
            println!();
        }
    }

    if let Some(summary) = engine.party_summary() {
        super::print_party(&summary);
    }

    Ok(())
}

fn show_faction(engine: &FactionEngine, id: &str) -> Result<(), String> {
    let status = engine
        .faction_status(id)
        .ok_or_else(|| EngineError::UnknownFaction(id.to_string()).to_string())?;

    println!("  {} [{}]", status.name.bold(), status.faction_id.dimmed());
    if let Some(definition) = engine.definition(id)
        && !definition.description.is_empty()
    {
        println!("  {}", definition.description);
    }
    println!();

    println!("  level:       {}", status.level);
    println!("  points:      {}", status.territory_points);
    println!(
        "  territory:   {} hexes, {} settlements, {} strongholds, {} domains",
        status.territory.hexes,
        status.territory.settlements,
        status.territory.strongholds,
        status.territory.domains
    );
    if let Some(allowance) = engine.actions_per_turn(id) {
        println!("  actions/turn: {allowance}");
    }
    println!();

    println!("  {}", "Actions".bold().underline());
    if status.actions.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for action in &status.actions {
        let bar = progress_bar(action.progress, action.segments);
        println!(
            "  {:<20} {bar} {}/{}",
            action.action_id, action.progress, action.segments
        );
    }
    println!();

    if !status.recent_news.is_empty() {
        println!("  {}", "Recent News".bold().underline());
        for line in &status.recent_news {
            println!("  {line}");
        }
        println!();
    }

    if let Some(party) = engine.party_state() {
        let standing = party.standing(id);
        let modifiers = StandingModifiers::for_standing(standing);
        println!(
            "  party standing: {standing:+} ({}), prices x{:.2}, reactions {:+}",
            modifiers.tier,
            modifiers.cost_multiplier(),
            modifiers.encounter_modifier
        );
        println!();
    }

    Ok(())
}

fn progress_bar(progress: u32, segments: u32) -> String {
    let filled = progress.min(segments) as usize;
    let empty = segments.saturating_sub(progress) as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    if progress >= segments {
        format!("[{}]", bar.green())
    } else {
        format!("[{bar}]")
    }
}
