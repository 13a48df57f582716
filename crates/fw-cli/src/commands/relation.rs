use std::path::Path;

use colored::Colorize;

pub fn run(path: &Path, a: &str, b: &str) -> Result<(), String> {
    let scenario = super::load_scenario(path)?;
    let resolver = scenario.relationship_resolver();

    println!("  {} {} <-> {}", "Relation".bold(), a, b);

    let Some(found) = resolver.resolve(a, b) else {
        println!("  score:     0");
        println!("  sentiment: neutral");
        println!("  matched:   {}", "(no relation; neutral)".dimmed());
        return Ok(());
    };

    let score = found.relation.score;
    let score_label = format!("{score:+}");
    let score_label = if resolver.is_hostile(a, b) {
        score_label.red()
    } else if resolver.is_friendly(a, b) {
        score_label.green()
    } else {
        score_label.normal()
    };
    println!("  score:     {score_label}");
    println!("  sentiment: {}", found.relation.sentiment);
    let how = if found.exact { "exact" } else { "via groups" };
    println!("  matched:   {} <-> {} ({how})", found.via_a, found.via_b);
    if !found.relation.notes.is_empty() {
        println!("  notes:     {}", found.relation.notes);
    }

    Ok(())
}
