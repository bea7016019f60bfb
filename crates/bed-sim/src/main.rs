use std::error::Error;
use std::fs;
use std::path::Path;

use bed_graph::{dag_from_json, Dag};
use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    experiment::{self, ExperimentArgs},
    generate::{self, GenerateArgs},
    mec::{self, MecArgs},
    select::{self, SelectArgs},
    suite::{self, SuiteArgs},
};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "bed-sim", version, about = "Batched intervention design experiments")]
struct Cli {
    /// Logging level; falls back to `BED_LOG`, then `info`.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the standing experiment suite for one run id.
    Suite(SuiteArgs),
    /// Run one experiment from a YAML configuration.
    Experiment(ExperimentArgs),
    /// Select a batch for a single DAG and print its expected gain.
    Select(SelectArgs),
    /// Count (and optionally list) the equivalence class of a DAG.
    Mec(MecArgs),
    /// Draw a DAG from a named generator.
    Generate(GenerateArgs),
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level);
    match cli.command {
        Command::Suite(args) => suite::run(&args),
        Command::Experiment(args) => experiment::run(&args),
        Command::Select(args) => select::run(&args),
        Command::Mec(args) => mec::run(&args),
        Command::Generate(args) => generate::run(&args),
    }
}

fn read_dag(path: &Path) -> Result<Dag, Box<dyn Error>> {
    let json = fs::read_to_string(path)?;
    Ok(dag_from_json(&json)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
