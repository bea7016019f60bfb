use std::error::Error;
use std::path::PathBuf;

use bed_core::rng::RngHandle;
use bed_core::Intervention;
use bed_exp::{scoring_members, select_batch, Method, SelectionSettings};
use bed_graph::observational_essential_graph;
use bed_select::mean_oriented_gain;
use clap::Args;
use serde::Serialize;

use crate::{print_json, read_dag};

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// DAG as JSON; selection only sees its essential graph.
    #[arg(long)]
    pub dag: PathBuf,
    /// Selection method (`rand`, `ss_a`, `ss_b`, `ss_a_cont`, `ss_b_cont`,
    /// `cont`, `drg`, `greedy`, `scg`).
    #[arg(long)]
    pub method: Method,
    /// Batch size.
    #[arg(short = 'b', long = "batch", default_value_t = 1)]
    pub batch: usize,
    /// Nodes per intervention.
    #[arg(short = 'k', long, default_value_t = 1)]
    pub k: usize,
    /// Seed of the selection.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Class members in the optimised objective.
    #[arg(long, default_value_t = 40)]
    pub samples: usize,
    /// Largest class scored exactly.
    #[arg(long, default_value_t = 10_000)]
    pub max_enumeration: u64,
}

#[derive(Debug, Serialize)]
struct Selection {
    method: Method,
    batch: Vec<Intervention>,
    expected_gain: f64,
    undirected: usize,
}

pub fn run(args: &SelectArgs) -> Result<(), Box<dyn Error>> {
    let dag = read_dag(&args.dag)?;
    let cpdag = observational_essential_graph(&dag);
    let settings = SelectionSettings {
        objective_samples: args.samples,
        ..SelectionSettings::default()
    };
    let mut rng = RngHandle::from_seed(args.seed);
    let batch = select_batch(&settings, args.method, &cpdag, args.batch, args.k, &mut rng)?;
    let members = scoring_members(&cpdag, args.max_enumeration, &mut rng)?;
    print_json(&Selection {
        method: args.method,
        expected_gain: mean_oriented_gain(&cpdag, &members, &batch),
        batch,
        undirected: cpdag.num_undirected(),
    })
}
