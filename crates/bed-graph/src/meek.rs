use std::collections::VecDeque;

use crate::pdag::Pdag;

/// Closes `pdag` under Meek rules R1-R4, checking every node.
///
/// Returns the number of edges oriented by the closure.
pub fn meek_closure(pdag: &mut Pdag) -> usize {
    let mut work = Worklist::new(pdag.num_nodes());
    for node in 0..pdag.num_nodes() {
        work.push(node);
    }
    propagate(pdag, work)
}

/// Closes `pdag` under Meek rules R1-R4 after the edges in `seeds` were
/// oriented. Only undirected edges whose rule premises can have changed are
/// revisited.
pub fn meek_closure_from(pdag: &mut Pdag, seeds: &[(usize, usize)]) -> usize {
    let mut work = Worklist::new(pdag.num_nodes());
    for &(u, v) in seeds {
        work.touch(pdag, u, v);
    }
    propagate(pdag, work)
}

fn propagate(pdag: &mut Pdag, mut work: Worklist) -> usize {
    let mut oriented = 0;
    while let Some(a) = work.pop() {
        for b in pdag.undirected_neighbors(a) {
            if !pdag.is_undirected(a, b) {
                continue;
            }
            let (from, to) = if forced(pdag, a, b) {
                (a, b)
            } else if forced(pdag, b, a) {
                (b, a)
            } else {
                continue;
            };
            pdag.orient(from, to);
            oriented += 1;
            work.touch(pdag, from, to);
        }
    }
    oriented
}

/// Returns whether the undirected edge `a - b` must be oriented `a -> b`.
fn forced(pdag: &Pdag, a: usize, b: usize) -> bool {
    let n = pdag.num_nodes();
    // R1: c -> a - b with c, b non-adjacent.
    if (0..n).any(|c| pdag.is_directed(c, a) && c != b && !pdag.adjacent(c, b)) {
        return true;
    }
    // R2: a -> c -> b.
    if (0..n).any(|c| pdag.is_directed(a, c) && pdag.is_directed(c, b)) {
        return true;
    }
    // R3: two non-adjacent undirected neighbours of a that both point into b.
    let kites: Vec<usize> = (0..n)
        .filter(|&c| pdag.is_undirected(a, c) && pdag.is_directed(c, b))
        .collect();
    for (i, &c) in kites.iter().enumerate() {
        if kites[i + 1..].iter().any(|&d| !pdag.adjacent(c, d)) {
            return true;
        }
    }
    // R4: c -> d -> b, a adjacent to both, c and b non-adjacent.
    for d in 0..n {
        if d == a || !pdag.is_directed(d, b) || !pdag.adjacent(a, d) {
            continue;
        }
        if (0..n).any(|c| {
            c != a && c != b && pdag.is_directed(c, d) && pdag.adjacent(a, c) && !pdag.adjacent(c, b)
        }) {
            return true;
        }
    }
    false
}

struct Worklist {
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl Worklist {
    fn new(n: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: vec![false; n],
        }
    }

    fn push(&mut self, node: usize) {
        if !self.queued[node] {
            self.queued[node] = true;
            self.queue.push_back(node);
        }
    }

    fn pop(&mut self) -> Option<usize> {
        let node = self.queue.pop_front()?;
        self.queued[node] = false;
        Some(node)
    }

    /// Queues every node whose incident undirected edges may be affected by
    /// the new orientation `u -> v`. Children of `v` cover the R4 pattern
    /// where `u -> v` is the upper directed edge.
    fn touch(&mut self, pdag: &Pdag, u: usize, v: usize) {
        self.push(u);
        self.push(v);
        for child in pdag.children(v) {
            self.push(child);
        }
    }
}
