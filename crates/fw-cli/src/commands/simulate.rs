use std::path::PathBuf;

use colored::Colorize;

use fw_engine::{ActionRollResult, CycleResult};

/// Options for `fw simulate`.
pub struct SimulateArgs {
    pub scenario: PathBuf,
    pub days: u32,
    pub step: u32,
    pub seed: u64,
    pub snapshot_in: Option<PathBuf>,
    pub snapshot_out: Option<PathBuf>,
    pub json: bool,
}

pub fn run(args: &SimulateArgs) -> Result<(), String> {
    if args.step == 0 {
        return Err("--step must be at least 1".into());
    }

    let scenario = super::load_scenario(&args.scenario)?;
    let mut engine = super::build_engine(&scenario, args.seed, args.snapshot_in.as_deref())?;
    let start_date = engine.current_date().to_string();

    let mut cycles = Vec::new();
    let mut remaining = args.days;
    while remaining > 0 {
        let days = args.step.min(remaining);
        remaining -= days;
        if let Some(cycle) = engine.advance(days) {
            cycles.push(cycle);
        }
    }

    if let Some(path) = &args.snapshot_out {
        engine
            .to_snapshot()
            .save(path)
            .map_err(|e| format!("failed to save snapshot: {e}"))?;
    }

    if args.json {
        let report = serde_json::json!({
            "days": args.days,
            "seed": args.seed,
            "cycles": cycles,
            "factions": engine.all_factions_summary(),
            "party": engine.party_summary(),
        });
        let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    // Header
    println!(
        "  {} {} {}",
        "Simulation".bold(),
        args.scenario.display(),
        format!("({} days, step={}, seed={})", args.days, args.step, args.seed).dimmed()
    );
    println!(
        "  {} cycle{} run, {} total",
        cycles.len(),
        if cycles.len() == 1 { "" } else { "s" },
        engine.clock().cycles_completed()
    );
    if !start_date.is_empty() {
        println!("  Date: {start_date} -> {}", engine.current_date());
    }
    println!();

    for cycle in &cycles {
        print_cycle(cycle);
    }

    println!("  {}", "Faction Status".bold().underline());
    println!();
    super::print_faction_table(&engine.all_factions_summary());
    println!();

    if let Some(summary) = engine.party_summary() {
        super::print_party(&summary);
    }

    Ok(())
}

fn print_cycle(cycle: &CycleResult) {
    let date = if cycle.date.is_empty() {
        String::new()
    } else {
        format!(" ({})", cycle.date)
    };
    println!(
        "  {}",
        format!("Cycle {}{date}", cycle.cycle_number).bold().underline()
    );

    for faction in &cycle.faction_results {
        for action in &faction.actions {
            println!("  {:<12} {}", faction.faction_id, describe_roll(action));
            for effect in &action.effects_applied {
                let mark = if effect.success {
                    "ok".green()
                } else {
                    "failed".red()
                };
                println!("                 {mark} {}", effect.description);
            }
        }
    }

    for event in &cycle.oracle_events {
        println!("  {} {}", "ORACLE".magenta().bold(), event.as_rumor_text());
    }
    for rumor in &cycle.rumors_generated {
        println!("  {}  {}", "RUMOR".cyan().bold(), rumor.text);
    }
    println!();
}

fn describe_roll(action: &ActionRollResult) -> String {
    let mut line = format!(
        "{} rolled {} ({:+}) -> +{}, {}/{}",
        action.action_id,
        action.roll,
        action.modifier,
        action.delta,
        action.new_progress,
        action.segments
    );
    if action.complication {
        line.push_str(&format!(" {}", "complication".yellow()));
    }
    if action.completed {
        line.push_str(&format!(" {}", "COMPLETE".green().bold()));
    }
    line
}
