use std::error::Error;
use std::path::PathBuf;

use bed_exp::{load_config, run_experiment, summarise, write_report};
use clap::Args;

#[derive(Args, Debug)]
pub struct ExperimentArgs {
    /// YAML experiment configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Master seed.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Output directory for the report files.
    #[arg(long)]
    pub out: PathBuf,
    /// File prefix; defaults to the configuration's name.
    #[arg(long)]
    pub name: Option<String>,
}

pub fn run(args: &ExperimentArgs) -> Result<(), Box<dyn Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(name) = &args.name {
        config.name = name.clone();
    }
    let report = run_experiment(&config, args.seed)?;
    write_report(&report, &args.out, &config.name)?;
    for row in summarise(&report) {
        println!("{}\t{:.4}\t{:.4}", row.key, row.mean, row.std_error);
    }
    Ok(())
}
