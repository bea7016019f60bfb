use bed_core::Intervention;

use crate::dag::Dag;
use crate::meek::{meek_closure, meek_closure_from};
use crate::pdag::Pdag;

/// Returns the essential graph (CPDAG) of `dag` identifiable from
/// observational data: the skeleton, every unshielded collider, and the
/// Meek closure of both.
pub fn observational_essential_graph(dag: &Dag) -> Pdag {
    let n = dag.num_nodes();
    let mut cpdag = Pdag::from_skeleton(dag);
    for child in 0..n {
        let parents = dag.parents(child);
        for (i, &p) in parents.iter().enumerate() {
            for &q in &parents[i + 1..] {
                if !dag.adjacent(p, q) {
                    cpdag.orient(p, child);
                    cpdag.orient(q, child);
                }
            }
        }
    }
    meek_closure(&mut cpdag);
    cpdag
}

/// Updates `pdag` with infinite-sample data from hard interventions on the
/// true graph `dag`.
///
/// Every undirected edge that crosses the boundary of an intervention takes
/// its true orientation, then the result is closed under the Meek rules.
/// Nodes outside the graph are ignored. Returns the number of newly oriented
/// edges.
pub fn orient_from_interventions(dag: &Dag, pdag: &mut Pdag, interventions: &[Intervention]) -> usize {
    let n = pdag.num_nodes();
    let mut inside = vec![false; n];
    let mut learned = Vec::new();
    for intervention in interventions {
        inside.iter_mut().for_each(|flag| *flag = false);
        for &v in intervention.iter().filter(|&&v| v < n) {
            inside[v] = true;
        }
        for &v in intervention.iter().filter(|&&v| v < n) {
            for other in 0..n {
                if inside[other] || !pdag.is_undirected(v, other) {
                    continue;
                }
                let edge = if dag.has_edge(v, other) {
                    (v, other)
                } else if dag.has_edge(other, v) {
                    (other, v)
                } else {
                    continue;
                };
                pdag.orient(edge.0, edge.1);
                learned.push(edge);
            }
        }
    }
    learned.len() + meek_closure_from(pdag, &learned)
}

/// Number of edges of `pdag` that `interventions` would orient when `dag` is
/// the ground truth. `pdag` itself is left untouched.
pub fn oriented_gain(dag: &Dag, pdag: &Pdag, interventions: &[Intervention]) -> usize {
    let mut updated = pdag.clone();
    orient_from_interventions(dag, &mut updated, interventions)
}
