use std::collections::BTreeSet;

use bed_core::errors::{BedError, ErrorInfo};
use bed_core::rng::RngHandle;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::dag::Dag;

/// Chain `0 -> 1 -> ... -> n-1`; its MEC contains no unshielded collider.
pub fn chain_no_colliders(n: usize) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    Ok(Dag::from_ordered_edges(n, (1..n).map(|v| (v - 1, v))))
}

/// Chain whose edges point away from `root` in both directions.
pub fn chain_with_root(n: usize, root: usize) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    if root >= n {
        return Err(BedError::Graph(
            ErrorInfo::new("unknown-node", "chain root outside the graph")
                .with_context("root", root)
                .with_context("nodes", n),
        ));
    }
    let left = (0..root).map(|i| (i + 1, i));
    let right = (root..n.saturating_sub(1)).map(|i| (i, i + 1));
    Ok(Dag::from_ordered_edges(n, left.chain(right)))
}

/// Chain skeleton with every edge direction drawn by a fair coin, so the
/// graph may contain colliders.
pub fn chain_random_directions(n: usize, rng: &mut RngHandle) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    for i in 0..n.saturating_sub(1) {
        if rng.gen_bool(0.5) {
            edges.push((i + 1, i));
        } else {
            edges.push((i, i + 1));
        }
    }
    Dag::from_edges(n, &edges)
}

/// Uniformly random tree skeleton, rooted at a uniformly random node with
/// every edge pointing away from the root.
pub fn uniform_random_tree(n: usize, rng: &mut RngHandle) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    let mut pending: Vec<usize> = (0..n).collect();
    pending.shuffle(rng);
    let mut attached = Vec::with_capacity(n);
    let mut neighbors = vec![Vec::new(); n];
    if let Some(first) = pending.pop() {
        attached.push(first);
    }
    while let Some(node) = pending.pop() {
        let anchor = attached[rng.gen_range(0..attached.len())];
        neighbors[anchor].push(node);
        neighbors[node].push(anchor);
        attached.push(node);
    }

    let root = rng.gen_range(0..n);
    let mut edges = Vec::with_capacity(n - 1);
    let mut visited = vec![false; n];
    let mut stack = vec![root];
    visited[root] = true;
    while let Some(node) = stack.pop() {
        for &next in &neighbors[node] {
            if !visited[next] {
                visited[next] = true;
                edges.push((node, next));
                stack.push(next);
            }
        }
    }
    Dag::from_edges(n, &edges)
}

/// Forest of stars over a shuffled node order; each star has `ceil(n / k)`
/// nodes with the hub pointing at every leaf.
pub fn k_star_forest(n: usize, k: usize, rng: &mut RngHandle) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    if k == 0 {
        return Err(BedError::Graph(ErrorInfo::new(
            "invalid-parameter",
            "star forest needs at least one star",
        )));
    }
    let star_size = n.div_ceil(k);
    let mut nodes: Vec<usize> = (0..n).collect();
    nodes.shuffle(rng);
    let mut edges = Vec::new();
    let mut hub = nodes[0];
    for (i, &node) in nodes.iter().enumerate() {
        if i % star_size == 0 {
            hub = node;
        } else {
            edges.push((hub, node));
        }
    }
    Dag::from_edges(n, &edges)
}

/// Complete DAG following the node order; its MEC is every permutation.
pub fn fully_connected(n: usize) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    Ok(Dag::from_ordered_edges(
        n,
        (0..n).flat_map(|u| ((u + 1)..n).map(move |v| (u, v))),
    ))
}

/// Erdős–Rényi DAG: every pair is joined with probability `p` and oriented
/// along a uniformly random node order.
pub fn erdos_renyi(n: usize, p: f64, rng: &mut RngHandle) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    ensure_probability("p", p)?;
    let mut pairs = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen_bool(p) {
                pairs.push((u, v));
            }
        }
    }
    Ok(orient_by_random_order(n, &pairs, rng))
}

/// Random bipartite DAG: nodes `0..n1` form side one, `n1..n1 + n2` side two,
/// each cross pair is an edge from side one to side two with probability `p`.
pub fn bipartite_erdos_renyi(
    n1: usize,
    n2: usize,
    p: f64,
    rng: &mut RngHandle,
) -> Result<Dag, BedError> {
    ensure_nodes(n1 + n2)?;
    ensure_probability("p", p)?;
    let mut edges = Vec::new();
    for u in 0..n1 {
        for v in n1..(n1 + n2) {
            if rng.gen_bool(p) {
                edges.push((u, v));
            }
        }
    }
    Ok(Dag::from_ordered_edges(n1 + n2, edges))
}

/// Barabási–Albert preferential attachment grown from a star on `m + 1`
/// nodes; each new node attaches to `m` distinct existing nodes chosen
/// proportionally to degree. Edges follow a random node order.
pub fn barabasi_albert(n: usize, m: usize, rng: &mut RngHandle) -> Result<Dag, BedError> {
    ensure_nodes(n)?;
    if m == 0 || m >= n {
        return Err(BedError::Graph(
            ErrorInfo::new("invalid-parameter", "attachment count must satisfy 1 <= m < n")
                .with_context("m", m)
                .with_context("nodes", n),
        ));
    }
    let mut pairs: Vec<(usize, usize)> = (1..=m).map(|leaf| (0, leaf)).collect();
    let mut repeated: Vec<usize> = Vec::new();
    for &(u, v) in &pairs {
        repeated.push(u);
        repeated.push(v);
    }
    for source in (m + 1)..n {
        let mut targets = BTreeSet::new();
        while targets.len() < m {
            targets.insert(repeated[rng.gen_range(0..repeated.len())]);
        }
        for target in targets {
            pairs.push((target, source));
            repeated.push(target);
            repeated.push(source);
        }
    }
    Ok(orient_by_random_order(n, &pairs, rng))
}

/// Directed scale-free growth (Bollobás et al.) starting from a 3-cycle.
///
/// With probability `alpha` a new node points at an existing node chosen by
/// in-degree, with probability `beta` an edge joins two existing nodes chosen
/// by out- and in-degree, otherwise an existing node chosen by out-degree
/// points at a new node. Self loops are dropped, multi-edges merged, and the
/// skeleton is oriented along a random node order.
pub fn scale_free(n: usize, alpha: f64, beta: f64, rng: &mut RngHandle) -> Result<Dag, BedError> {
    const DELTA_IN: f64 = 0.2;
    const DELTA_OUT: f64 = 0.0;

    ensure_nodes(n)?;
    ensure_probability("alpha", alpha)?;
    ensure_probability("beta", beta)?;
    if alpha + beta > 1.0 {
        return Err(BedError::Graph(
            ErrorInfo::new("invalid-probability", "alpha + beta must not exceed 1")
                .with_context("alpha", alpha)
                .with_context("beta", beta),
        ));
    }
    if n < 3 {
        return Err(BedError::Graph(
            ErrorInfo::new("too-small", "scale-free growth starts from a 3-cycle")
                .with_context("nodes", n),
        ));
    }

    let mut in_degree = vec![1usize, 1, 1];
    let mut out_degree = vec![1usize, 1, 1];
    let mut arcs = vec![(0usize, 1usize), (1, 2), (2, 0)];
    while in_degree.len() < n {
        let draw: f64 = rng.gen();
        let (source, target) = if draw < alpha {
            let target = pick_by_degree(&in_degree, DELTA_IN, rng)?;
            (in_degree.len(), target)
        } else if draw < alpha + beta {
            let source = pick_by_degree(&out_degree, DELTA_OUT, rng)?;
            let target = pick_by_degree(&in_degree, DELTA_IN, rng)?;
            (source, target)
        } else {
            let source = pick_by_degree(&out_degree, DELTA_OUT, rng)?;
            (source, in_degree.len())
        };
        if source == in_degree.len() || target == in_degree.len() {
            in_degree.push(0);
            out_degree.push(0);
        }
        out_degree[source] += 1;
        in_degree[target] += 1;
        arcs.push((source, target));
    }

    let pairs: BTreeSet<(usize, usize)> = arcs
        .into_iter()
        .filter(|(u, v)| u != v)
        .map(|(u, v)| (u.min(v), u.max(v)))
        .collect();
    let pairs: Vec<_> = pairs.into_iter().collect();
    Ok(orient_by_random_order(n, &pairs, rng))
}

fn pick_by_degree(degrees: &[usize], delta: f64, rng: &mut RngHandle) -> Result<usize, BedError> {
    let weights = degrees.iter().map(|&d| d as f64 + delta);
    let dist = WeightedIndex::new(weights).map_err(|err| {
        BedError::Graph(ErrorInfo::new("degenerate-weights", err.to_string()))
    })?;
    Ok(dist.sample(rng))
}

fn orient_by_random_order(n: usize, pairs: &[(usize, usize)], rng: &mut RngHandle) -> Dag {
    let mut rank: Vec<usize> = (0..n).collect();
    rank.shuffle(rng);
    Dag::from_ordered_edges(
        n,
        pairs.iter().map(|&(u, v)| if rank[u] < rank[v] { (u, v) } else { (v, u) }),
    )
}

fn ensure_nodes(n: usize) -> Result<(), BedError> {
    if n == 0 {
        return Err(BedError::Graph(ErrorInfo::new(
            "empty-graph",
            "generator requires at least one node",
        )));
    }
    Ok(())
}

fn ensure_probability(name: &str, value: f64) -> Result<(), BedError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(BedError::Graph(
            ErrorInfo::new("invalid-probability", "probability outside [0, 1]")
                .with_context(name, value),
        ));
    }
    Ok(())
}
