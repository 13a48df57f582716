use colored::Colorize;

use fw_core::SeededDice;
use fw_oracle::oracle::{MeaningTables, consult};
use fw_oracle::{ChaosFactor, FateAnswer, Likelihood};

pub fn run(likelihood: &str, chaos: u32, seed: u64) -> Result<(), String> {
    let likelihood = Likelihood::parse(likelihood).map_err(|e| e.to_string())?;
    let chaos = ChaosFactor::try_new(chaos).map_err(|e| e.to_string())?;
    let mut dice = SeededDice::new(seed);

    let check = consult(
        likelihood,
        chaos.value(),
        &mut dice,
        &MeaningTables::default(),
        true,
    );

    let answer = check.answer.to_string();
    let answer = match check.answer {
        FateAnswer::ExceptionalYes => answer.green().bold(),
        FateAnswer::Yes => answer.green(),
        FateAnswer::No => answer.red(),
        FateAnswer::ExceptionalNo => answer.red().bold(),
    };
    println!(
        "  {} {}",
        answer,
        format!(
            "({likelihood}, chaos {}, rolled {} vs {})",
            chaos.value(),
            check.roll,
            check.target
        )
        .dimmed()
    );
    if let Some(event) = &check.random_event {
        println!("  {} {event}", "Random event:".yellow().bold());
    }

    Ok(())
}
