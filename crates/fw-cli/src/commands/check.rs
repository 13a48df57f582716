use std::path::Path;

use colored::Colorize;

use fw_engine::EngineConfig;

pub fn run(path: &Path) -> Result<(), String> {
    let scenario = super::load_scenario(path)?;
    let engine = scenario.build_engine(EngineConfig::default());

    let actions: usize = engine
        .faction_states()
        .values()
        .map(|s| s.active_actions.len())
        .sum();
    println!(
        "  {} factions, {} active actions, {} relations, {} groups",
        scenario.factions.len(),
        actions,
        scenario.relations.len(),
        scenario.groups.len()
    );

    let warnings = engine.warnings();
    if warnings.is_empty() {
        println!("  All checks passed for '{}'.", path.display());
    } else {
        for warning in warnings {
            println!("  {} {warning}", "warning:".yellow().bold());
        }
        println!(
            "  {} warning{}",
            warnings.len(),
            if warnings.len() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
