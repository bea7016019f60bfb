use bed_core::errors::{BedError, ErrorInfo};

/// Directed acyclic graph over nodes `0..n` stored as a dense adjacency matrix.
///
/// Every mutating constructor rejects edges that would close a directed cycle,
/// so a `Dag` value is acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dag {
    n: usize,
    adj: Vec<bool>,
}

impl Dag {
    /// Creates a graph with `n` nodes and no edges.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            adj: vec![false; n * n],
        }
    }

    /// Builds a graph from a list of `(from, to)` edges.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self, BedError> {
        let mut dag = Self::empty(n);
        for &(u, v) in edges {
            dag.insert_edge(u, v)?;
        }
        Ok(dag)
    }

    /// Builds a graph from edges that the caller guarantees to be acyclic.
    pub(crate) fn from_ordered_edges(
        n: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut dag = Self::empty(n);
        for (u, v) in edges {
            dag.adj[u * n + v] = true;
        }
        dag
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Returns whether `u -> v` is present.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj[u * self.n + v]
    }

    /// Returns whether `u` and `v` are joined in either direction.
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.has_edge(u, v) || self.has_edge(v, u)
    }

    /// Parents of `v` in increasing order.
    pub fn parents(&self, v: usize) -> Vec<usize> {
        (0..self.n).filter(|&u| self.has_edge(u, v)).collect()
    }

    /// Children of `v` in increasing order.
    pub fn children(&self, v: usize) -> Vec<usize> {
        (0..self.n).filter(|&w| self.has_edge(v, w)).collect()
    }

    /// All edges in row-major order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for u in 0..self.n {
            for v in 0..self.n {
                if self.has_edge(u, v) {
                    out.push((u, v));
                }
            }
        }
        out
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.adj.iter().filter(|&&present| present).count()
    }

    /// Inserts `u -> v`, rejecting self loops, unknown nodes and cycles.
    pub fn insert_edge(&mut self, u: usize, v: usize) -> Result<(), BedError> {
        if u >= self.n || v >= self.n {
            return Err(BedError::Graph(
                ErrorInfo::new("unknown-node", "edge endpoint outside the graph")
                    .with_context("from", u)
                    .with_context("to", v)
                    .with_context("nodes", self.n),
            ));
        }
        if u == v {
            return Err(BedError::Graph(
                ErrorInfo::new("self-loop", "self loops are not allowed").with_context("node", u),
            ));
        }
        if self.has_edge(u, v) {
            return Ok(());
        }
        if self.reaches(v, u) {
            return Err(BedError::Graph(
                ErrorInfo::new("would-create-cycle", "edge closes a directed cycle")
                    .with_context("from", u)
                    .with_context("to", v),
            ));
        }
        self.adj[u * self.n + v] = true;
        Ok(())
    }

    /// Returns whether a directed path leads from `from` to `to`.
    pub fn reaches(&self, from: usize, to: usize) -> bool {
        if from == to {
            return true;
        }
        let mut seen = vec![false; self.n];
        let mut stack = vec![from];
        seen[from] = true;
        while let Some(node) = stack.pop() {
            for next in 0..self.n {
                if self.has_edge(node, next) && !seen[next] {
                    if next == to {
                        return true;
                    }
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Kahn ordering; ties resolved by the smallest node index.
    pub fn topological_order(&self) -> Vec<usize> {
        let mut in_degree: Vec<usize> = (0..self.n).map(|v| self.parents(v).len()).collect();
        let mut ready: std::collections::BTreeSet<usize> =
            (0..self.n).filter(|&v| in_degree[v] == 0).collect();
        let mut order = Vec::with_capacity(self.n);
        while let Some(node) = ready.pop_first() {
            order.push(node);
            for child in self.children(node) {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    ready.insert(child);
                }
            }
        }
        order
    }
}
