use std::collections::HashMap;

use bed_core::errors::{BedError, ErrorInfo};
use bed_graph::{meek_closure_from, Pdag};

/// Memoised counter of acyclic moral orientations.
///
/// Counts are cached per vertex set, so repeated queries against the same
/// essential graph (for example from a sampler) stay cheap.
#[derive(Debug, Clone)]
pub struct MecCounter {
    pdag: Pdag,
    counts: HashMap<Vec<usize>, u128>,
}

/// Number of DAGs in the equivalence class described by `pdag`.
pub fn mec_size(pdag: &Pdag) -> Result<u128, BedError> {
    MecCounter::new(pdag).size()
}

impl MecCounter {
    /// Creates a counter for the class described by `pdag`.
    pub fn new(pdag: &Pdag) -> Self {
        Self {
            pdag: pdag.clone(),
            counts: HashMap::new(),
        }
    }

    /// Returns the graph the counter was built for.
    pub fn pdag(&self) -> &Pdag {
        &self.pdag
    }

    /// Size of the whole class: product of the component counts.
    pub fn size(&mut self) -> Result<u128, BedError> {
        let mut total: u128 = 1;
        for component in self.pdag.undirected_components() {
            let count = self.component_size(&component)?;
            total = checked_mul(total, count, component.len())?;
        }
        Ok(total)
    }

    /// Number of AMOs of the connected undirected component on `component`
    /// (sorted node ids of the original graph).
    pub fn component_size(&mut self, component: &[usize]) -> Result<u128, BedError> {
        if component.len() <= 1 {
            return Ok(1);
        }
        if let Some(&count) = self.counts.get(component) {
            return Ok(count);
        }
        let nodes = component.len();
        let edges = self.pdag.undirected_subgraph(component).num_undirected();
        let count = if edges == nodes - 1 {
            nodes as u128
        } else if edges == nodes * (nodes - 1) / 2 {
            factorial(nodes)?
        } else {
            let mut sum: u128 = 0;
            for &root in component {
                let rooted = self.rooted_size(component, root)?;
                sum = sum.checked_add(rooted).ok_or_else(|| overflow(nodes))?;
            }
            sum
        };
        self.counts.insert(component.to_vec(), count);
        Ok(count)
    }

    /// Number of AMOs of `component` in which `root` is the unique source.
    pub fn rooted_size(&mut self, component: &[usize], root: usize) -> Result<u128, BedError> {
        let (_, remaining) = self.orient_from_root(component, root);
        let mut total: u128 = 1;
        for sub in remaining {
            let count = self.component_size(&sub)?;
            total = checked_mul(total, count, component.len())?;
        }
        Ok(total)
    }

    /// Orients every edge of `component` out of `root` and closes under the
    /// Meek rules. Returns the directed edges and the undirected components
    /// that remain, both in original node ids.
    pub(crate) fn orient_from_root(
        &self,
        component: &[usize],
        root: usize,
    ) -> (Vec<(usize, usize)>, Vec<Vec<usize>>) {
        let mut local = self.pdag.undirected_subgraph(component);
        let Some(local_root) = component.iter().position(|&node| node == root) else {
            return (Vec::new(), vec![component.to_vec()]);
        };
        let mut seeds = Vec::new();
        for neighbor in local.undirected_neighbors(local_root) {
            local.orient(local_root, neighbor);
            seeds.push((local_root, neighbor));
        }
        meek_closure_from(&mut local, &seeds);

        let directed = local
            .directed_edges()
            .into_iter()
            .map(|(u, v)| (component[u], component[v]))
            .collect();
        let remaining = local
            .undirected_components()
            .into_iter()
            .map(|sub| sub.into_iter().map(|idx| component[idx]).collect())
            .collect();
        (directed, remaining)
    }
}

fn factorial(n: usize) -> Result<u128, BedError> {
    let mut acc: u128 = 1;
    for k in 2..=n as u128 {
        acc = acc.checked_mul(k).ok_or_else(|| overflow(n))?;
    }
    Ok(acc)
}

fn checked_mul(lhs: u128, rhs: u128, nodes: usize) -> Result<u128, BedError> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(nodes))
}

fn overflow(nodes: usize) -> BedError {
    BedError::Mec(
        ErrorInfo::new("count-overflow", "class size does not fit in 128 bits")
            .with_context("component_nodes", nodes)
            .with_hint("use SamplingMode::Fast, which does not need class sizes"),
    )
}
