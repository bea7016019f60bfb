use bed_core::errors::{BedError, ErrorInfo};
use bed_graph::{Dag, Pdag};
use tracing::debug;

use crate::count::MecCounter;

/// Lists every DAG of the class described by `pdag`.
///
/// Fails with `enumeration-limit` when the class holds more than `limit`
/// members; the size is checked before any DAG is built.
pub fn enumerate_dags(pdag: &Pdag, limit: u128) -> Result<Vec<Dag>, BedError> {
    let mut counter = MecCounter::new(pdag);
    let size = counter.size()?;
    if size > limit {
        return Err(BedError::Mec(
            ErrorInfo::new("enumeration-limit", "equivalence class is too large to enumerate")
                .with_context("size", size)
                .with_context("limit", limit)
                .with_hint("score against a uniform sample instead"),
        ));
    }

    let mut partial: Vec<Vec<(usize, usize)>> = vec![pdag.directed_edges()];
    for component in pdag.undirected_components() {
        let options = orientations(&counter, &component);
        partial = cross(&partial, &options);
    }
    debug!(size = partial.len(), "enumerated equivalence class");

    partial
        .into_iter()
        .map(|edges| Dag::from_edges(pdag.num_nodes(), &edges))
        .collect()
}

/// Every AMO of `component` as an edge list.
fn orientations(counter: &MecCounter, component: &[usize]) -> Vec<Vec<(usize, usize)>> {
    if component.len() <= 1 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for &root in component {
        let (directed, remaining) = counter.orient_from_root(component, root);
        let mut rooted = vec![directed];
        for sub in remaining {
            rooted = cross(&rooted, &orientations(counter, &sub));
        }
        out.extend(rooted);
    }
    out
}

fn cross(left: &[Vec<(usize, usize)>], right: &[Vec<(usize, usize)>]) -> Vec<Vec<(usize, usize)>> {
    let mut out = Vec::with_capacity(left.len() * right.len());
    for a in left {
        for b in right {
            let mut merged = a.clone();
            merged.extend_from_slice(b);
            out.push(merged);
        }
    }
    out
}
