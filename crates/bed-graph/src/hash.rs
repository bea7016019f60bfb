use sha2::{Digest, Sha256};

use crate::dag::Dag;
use crate::pdag::Pdag;

/// Canonical structural hash of a DAG.
pub fn canonical_dag_hash(dag: &Dag) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"dag");
    hasher.update((dag.num_nodes() as u64).to_le_bytes());
    let edges = dag.edges();
    update_edges(&edges, &mut hasher);
    format!("{:x}", hasher.finalize())
}

/// Canonical structural hash of a partially directed graph.
pub fn canonical_pdag_hash(pdag: &Pdag) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"pdag");
    hasher.update((pdag.num_nodes() as u64).to_le_bytes());
    hasher.update(b"directed");
    update_edges(&pdag.directed_edges(), &mut hasher);
    hasher.update(b"undirected");
    update_edges(&pdag.undirected_edges(), &mut hasher);
    format!("{:x}", hasher.finalize())
}

fn update_edges(edges: &[(usize, usize)], hasher: &mut Sha256) {
    hasher.update((edges.len() as u64).to_le_bytes());
    for &(u, v) in edges {
        hasher.update((u as u64).to_le_bytes());
        hasher.update((v as u64).to_le_bytes());
    }
}
