use bed_core::errors::{BedError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::dag::Dag;

/// Edge mark stored for an ordered node pair of a [`Pdag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// No edge between the pair.
    None,
    /// The pair `(u, v)` carries `u -> v`.
    Directed,
    /// The pair carries `u - v`; always mirrored on `(v, u)`.
    Undirected,
}

/// Partially directed graph, typically an (interventional) essential graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pdag {
    n: usize,
    marks: Vec<Mark>,
}

impl Pdag {
    /// Creates a graph with `n` nodes and no edges.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            marks: vec![Mark::None; n * n],
        }
    }

    /// Returns the skeleton of `dag` with every edge undirected.
    pub fn from_skeleton(dag: &Dag) -> Self {
        let mut pdag = Self::empty(dag.num_nodes());
        for (u, v) in dag.edges() {
            pdag.set_undirected(u, v);
        }
        pdag
    }

    /// Returns the fully directed graph equal to `dag`.
    pub fn from_dag(dag: &Dag) -> Self {
        let mut pdag = Self::empty(dag.num_nodes());
        for (u, v) in dag.edges() {
            pdag.marks[u * pdag.n + v] = Mark::Directed;
        }
        pdag
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Mark stored for the ordered pair `(u, v)`.
    pub fn mark(&self, u: usize, v: usize) -> Mark {
        self.marks[u * self.n + v]
    }

    /// Returns whether `u -> v` is present.
    pub fn is_directed(&self, u: usize, v: usize) -> bool {
        self.mark(u, v) == Mark::Directed
    }

    /// Returns whether `u - v` is present.
    pub fn is_undirected(&self, u: usize, v: usize) -> bool {
        self.mark(u, v) == Mark::Undirected
    }

    /// Returns whether any edge joins `u` and `v`.
    pub fn adjacent(&self, u: usize, v: usize) -> bool {
        self.mark(u, v) != Mark::None || self.mark(v, u) != Mark::None
    }

    /// Adds the undirected edge `u - v`, replacing whatever joined the pair.
    pub fn set_undirected(&mut self, u: usize, v: usize) {
        self.marks[u * self.n + v] = Mark::Undirected;
        self.marks[v * self.n + u] = Mark::Undirected;
    }

    /// Turns an undirected `u - v` into `u -> v`.
    ///
    /// Returns `false` (and leaves the graph untouched) when the pair is not
    /// currently undirected.
    pub fn orient(&mut self, u: usize, v: usize) -> bool {
        if !self.is_undirected(u, v) {
            return false;
        }
        self.marks[u * self.n + v] = Mark::Directed;
        self.marks[v * self.n + u] = Mark::None;
        true
    }

    /// Nodes joined to `v` by an undirected edge.
    pub fn undirected_neighbors(&self, v: usize) -> Vec<usize> {
        (0..self.n).filter(|&u| self.is_undirected(v, u)).collect()
    }

    /// Nodes with a directed edge into `v`.
    pub fn parents(&self, v: usize) -> Vec<usize> {
        (0..self.n).filter(|&u| self.is_directed(u, v)).collect()
    }

    /// Nodes with a directed edge out of `v`.
    pub fn children(&self, v: usize) -> Vec<usize> {
        (0..self.n).filter(|&w| self.is_directed(v, w)).collect()
    }

    /// Directed edges in row-major order.
    pub fn directed_edges(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for u in 0..self.n {
            for v in 0..self.n {
                if self.is_directed(u, v) {
                    out.push((u, v));
                }
            }
        }
        out
    }

    /// Undirected edges as `(u, v)` with `u < v`.
    pub fn undirected_edges(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for u in 0..self.n {
            for v in (u + 1)..self.n {
                if self.is_undirected(u, v) {
                    out.push((u, v));
                }
            }
        }
        out
    }

    /// Number of directed edges; the edge-orienting objective value.
    pub fn num_directed(&self) -> usize {
        self.marks.iter().filter(|&&mark| mark == Mark::Directed).count()
    }

    /// Number of undirected edges.
    pub fn num_undirected(&self) -> usize {
        self.marks
            .iter()
            .filter(|&&mark| mark == Mark::Undirected)
            .count()
            / 2
    }

    /// Returns whether no undirected edge remains.
    pub fn is_fully_directed(&self) -> bool {
        !self.marks.contains(&Mark::Undirected)
    }

    /// Connected components of the undirected part that contain at least one
    /// undirected edge. Each component is sorted; components are ordered by
    /// their smallest node.
    pub fn undirected_components(&self) -> Vec<Vec<usize>> {
        let mut seen = vec![false; self.n];
        let mut components = Vec::new();
        for start in 0..self.n {
            if seen[start] || self.undirected_neighbors(start).is_empty() {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(node) = stack.pop() {
                component.push(node);
                for next in self.undirected_neighbors(node) {
                    if !seen[next] {
                        seen[next] = true;
                        stack.push(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Induced subgraph on `nodes` (renumbered to `0..nodes.len()` in the
    /// given order), keeping only undirected edges.
    pub fn undirected_subgraph(&self, nodes: &[usize]) -> Pdag {
        let mut sub = Pdag::empty(nodes.len());
        for (i, &u) in nodes.iter().enumerate() {
            for (j, &v) in nodes.iter().enumerate().skip(i + 1) {
                if self.is_undirected(u, v) {
                    sub.set_undirected(i, j);
                }
            }
        }
        sub
    }

    /// Converts a fully directed graph into a [`Dag`].
    pub fn to_dag(&self) -> Result<Dag, BedError> {
        if !self.is_fully_directed() {
            return Err(BedError::Graph(
                ErrorInfo::new("not-fully-directed", "graph still has undirected edges")
                    .with_context("undirected", self.num_undirected()),
            ));
        }
        Dag::from_edges(self.n, &self.directed_edges())
    }
}
