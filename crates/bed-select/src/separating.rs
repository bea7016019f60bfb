//! Separating systems: families of interventions of bounded size such that
//! every pair of nodes (or every undirected edge) is split by some member.

use bed_core::Intervention;
use bed_graph::Pdag;

/// Structure-agnostic `(n, k)` separating system.
///
/// Every node gets a distinct base-`a` label of length `l`, with
/// `a = max(ceil(n / k), 2)` and `l` the smallest length with `a^l >= n`.
/// Each (digit position, digit value) pair defines one set; sets larger
/// than `k` are split into chunks and empty sets dropped. Any two nodes
/// differ in some digit, so one of the two sets for that digit holds exactly
/// one of them.
pub fn generic_separating_system(n: usize, k: usize) -> Vec<Intervention> {
    if n <= 1 || k == 0 {
        return Vec::new();
    }
    let alphabet = n.div_ceil(k).max(2);
    let mut length = 0usize;
    let mut span = 1usize;
    while span < n {
        span = span.saturating_mul(alphabet);
        length += 1;
    }

    let mut system = Vec::new();
    let mut place = 1usize;
    for _ in 0..length {
        let mut sets: Vec<Vec<usize>> = vec![Vec::new(); alphabet];
        for node in 0..n {
            sets[(node / place) % alphabet].push(node);
        }
        for set in sets {
            system.extend(chunk(&set, k));
        }
        place = place.saturating_mul(alphabet);
    }
    system
}

/// Separating system for the undirected edges of `cpdag`.
///
/// Takes a matching-based 2-approximate vertex cover of the undirected part,
/// colours the subgraph it induces greedily in largest-first order, and
/// splits every colour class into interventions of at most `k` nodes.
pub fn graph_aware_separating_system(cpdag: &Pdag, k: usize) -> Vec<Intervention> {
    if k == 0 {
        return Vec::new();
    }
    let n = cpdag.num_nodes();
    let mut in_cover = vec![false; n];
    for (u, v) in cpdag.undirected_edges() {
        if !in_cover[u] && !in_cover[v] {
            in_cover[u] = true;
            in_cover[v] = true;
        }
    }
    let cover: Vec<usize> = (0..n).filter(|&v| in_cover[v]).collect();

    let covered_neighbors = |v: usize| -> Vec<usize> {
        cpdag
            .undirected_neighbors(v)
            .into_iter()
            .filter(|&w| in_cover[w])
            .collect()
    };
    let mut order = cover.clone();
    order.sort_by_key(|&v| (std::cmp::Reverse(covered_neighbors(v).len()), v));

    let mut colour: Vec<Option<usize>> = vec![None; n];
    let mut colours = 0usize;
    for &v in &order {
        let mut taken = vec![false; colours + 1];
        for w in covered_neighbors(v) {
            if let Some(c) = colour[w] {
                taken[c] = true;
            }
        }
        let c = taken.iter().position(|&used| !used).unwrap_or(colours);
        colour[v] = Some(c);
        colours = colours.max(c + 1);
    }

    let mut system = Vec::new();
    for c in 0..colours {
        let class: Vec<usize> = cover
            .iter()
            .copied()
            .filter(|&v| colour[v] == Some(c))
            .collect();
        system.extend(chunk(&class, k));
    }
    system
}

fn chunk(nodes: &[usize], k: usize) -> Vec<Intervention> {
    nodes.chunks(k).map(|piece| piece.to_vec()).collect()
}
