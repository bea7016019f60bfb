use std::error::Error;
use std::path::PathBuf;

use bed_graph::observational_essential_graph;
use bed_mec::{enumerate_dags, mec_size};
use clap::Args;
use serde::Serialize;

use crate::{print_json, read_dag};

#[derive(Args, Debug)]
pub struct MecArgs {
    /// DAG as JSON.
    #[arg(long)]
    pub dag: PathBuf,
    /// Also list every member as an edge list.
    #[arg(long)]
    pub enumerate: bool,
    /// Largest class listed with `--enumerate`.
    #[arg(long, default_value_t = 10_000)]
    pub limit: u64,
}

#[derive(Debug, Serialize)]
struct MecSummary {
    nodes: usize,
    directed: usize,
    undirected: usize,
    // decimal string; sizes can exceed u64
    size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    members: Option<Vec<Vec<(usize, usize)>>>,
}

pub fn run(args: &MecArgs) -> Result<(), Box<dyn Error>> {
    let dag = read_dag(&args.dag)?;
    let cpdag = observational_essential_graph(&dag);
    let size = mec_size(&cpdag)?;
    let members = if args.enumerate {
        let dags = enumerate_dags(&cpdag, args.limit as u128)?;
        Some(dags.iter().map(|member| member.edges()).collect())
    } else {
        None
    };
    print_json(&MecSummary {
        nodes: cpdag.num_nodes(),
        directed: cpdag.num_directed(),
        undirected: cpdag.num_undirected(),
        size: size.to_string(),
        members,
    })
}
