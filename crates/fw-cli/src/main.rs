//! CLI frontend for the Fenwold world-simulation engine.

mod commands;
mod wander;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fw",
    about = "Fenwold: a tick-synchronous shared-world simulation core",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn a world and advance it tick by tick
    Run {
        /// JSON spawn file describing the NPC population
        #[arg(short, long)]
        spawns: Option<PathBuf>,

        /// Spawn this many wandering NPCs when no spawn file is given
        #[arg(short, long, default_value = "25")]
        npcs: usize,

        /// Number of ticks to advance
        #[arg(short, long, default_value = "100")]
        ticks: u64,

        /// RNG seed for deterministic runs
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Print per-tick lifecycle event counts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report zone occupancy for a spawn file without ticking
    Zones {
        /// JSON spawn file describing the NPC population
        #[arg(short, long)]
        spawns: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            spawns,
            npcs,
            ticks,
            seed,
            verbose,
        } => commands::run::run(spawns.as_deref(), npcs, ticks, seed, verbose),
        Commands::Zones { spawns } => commands::zones::run(&spawns),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
