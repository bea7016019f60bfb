use std::error::Error;
use std::fs;
use std::path::PathBuf;

use bed_core::rng::RngHandle;
use bed_exp::{generate, GeneratorSpec};
use bed_graph::dag_to_json;
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Generator name (`tree`, `ER_0.25`, `barabasi_albert_2`, ...).
    #[arg(long)]
    pub generator: GeneratorSpec,
    /// Number of nodes.
    #[arg(short = 'n', long)]
    pub nodes: usize,
    /// Seed of the draw.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Star size for `kstar`.
    #[arg(short = 'k', long, default_value_t = 3)]
    pub k: usize,
    /// Directory holding the DREAM gold standards.
    #[arg(long)]
    pub dream_dir: Option<PathBuf>,
    /// Destination of the DAG as JSON.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let mut rng = RngHandle::from_seed(args.seed);
    let dag = generate(args.generator, args.nodes, args.k, args.dream_dir.as_deref(), &mut rng)?;
    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.out, dag_to_json(&dag)?)?;
    info!(generator = %args.generator, nodes = dag.num_nodes(), edges = dag.num_edges(), "graph written");
    Ok(())
}
