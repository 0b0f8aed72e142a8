use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    inspect::{self, InspectArgs},
    labels::{self, LabelsArgs},
    randomize::{self, RandomizeArgs},
    seed::{self, SeedArgs},
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "randomize-label",
    version,
    about = "Balanced, reproducible group randomization with label sheets"
)]
struct Cli {
    /// Log per-cell detail.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Review the selected columns of a roster before randomizing.
    Inspect(InspectArgs),
    /// Randomize a roster and write the assignment, seed, manifest and labels.
    Randomize(RandomizeArgs),
    /// Render label sheets from a previously saved assignment.
    Labels(LabelsArgs),
    /// Validate or generate a seed.
    Seed(SeedArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Inspect(args) => inspect::run(&args),
        Command::Randomize(args) => randomize::run(&args),
        Command::Labels(args) => labels::run(&args),
        Command::Seed(args) => seed::run(&args),
    }
}

pub(crate) fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
