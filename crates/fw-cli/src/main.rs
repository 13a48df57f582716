//! CLI frontend for the Factionweave faction simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fw",
    about = "Factionweave: faction turns for sandbox campaigns",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine rolls and contests to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a scenario and report rule and content warnings
    Check {
        /// Scenario JSON file
        scenario: PathBuf,
    },

    /// Advance the faction clock and report every cycle
    Simulate {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Days to simulate
        #[arg(short, long, default_value = "28")]
        days: u32,

        /// Days per advance call
        #[arg(long, default_value = "1")]
        step: u32,

        /// Seed for the dice
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Resume from a snapshot file
        #[arg(long)]
        snapshot_in: Option<PathBuf>,

        /// Write a snapshot file when done
        #[arg(long)]
        snapshot_out: Option<PathBuf>,

        /// Print cycles and final status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show faction status and party standings
    Status {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Snapshot to show instead of the starting state
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Show one faction in detail
        #[arg(short, long)]
        faction: Option<String>,
    },

    /// Resolve the relation between two factions or groups
    Relation {
        /// Scenario JSON file
        scenario: PathBuf,

        /// First faction or group id
        a: String,

        /// Second faction or group id
        b: String,
    },

    /// Ask the fate chart a yes/no question
    Oracle {
        /// Likelihood, e.g. likely, 50/50, very-unlikely
        likelihood: String,

        /// Chaos factor (1-9)
        #[arg(short, long, default_value = "5")]
        chaos: u32,

        /// Seed for the dice
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check { scenario } => commands::check::run(&scenario),
        Commands::Simulate {
            scenario,
            days,
            step,
            seed,
            snapshot_in,
            snapshot_out,
            json,
        } => commands::simulate::run(&commands::simulate::SimulateArgs {
            scenario,
            days,
            step,
            seed,
            snapshot_in,
            snapshot_out,
            json,
        }),
        Commands::Status {
            scenario,
            snapshot,
            faction,
        } => commands::status::run(&scenario, snapshot.as_deref(), faction.as_deref()),
        Commands::Relation { scenario, a, b } => commands::relation::run(&scenario, &a, &b),
        Commands::Oracle {
            likelihood,
            chaos,
            seed,
        } => commands::oracle::run(&likelihood, chaos, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
