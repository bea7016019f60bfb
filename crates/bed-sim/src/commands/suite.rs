use std::error::Error;
use std::path::PathBuf;

use bed_exp::{default_suite, run_suite};
use clap::Args;
use tracing::info;

const DEFAULT_SEED: u64 = 42;

#[derive(Args, Debug)]
pub struct SuiteArgs {
    /// Run id; selects the DREAM network and seeds the run. Without it the
    /// run id is 0 and the seed is 42.
    pub run: Option<u64>,
    /// Output directory for the per-experiment reports.
    #[arg(long)]
    pub out: PathBuf,
    /// Directory holding the DREAM gold standards; the DREAM entry is skipped
    /// without it.
    #[arg(long)]
    pub dream_dir: Option<PathBuf>,
    /// Experiments run in parallel.
    #[arg(long, default_value_t = 1)]
    pub threads: usize,
}

pub fn run(args: &SuiteArgs) -> Result<(), Box<dyn Error>> {
    let (run_id, seed) = match args.run {
        Some(run) => (run, run),
        None => (0, DEFAULT_SEED),
    };
    let configs = default_suite(run_id, args.dream_dir.as_deref());
    info!(run = run_id, seed, experiments = configs.len(), "starting suite");
    let files = run_suite(&configs, &args.out, seed, args.threads)?;
    for written in files {
        println!("{}", written.summary.display());
    }
    Ok(())
}
