//! Discrete selectors: random baselines, greedy and lazy greedy over
//! separating systems, and the lazy discrete random greedy.

use bed_core::errors::{BedError, ErrorInfo};
use bed_core::rng::RngHandle;
use bed_core::Intervention;
use bed_graph::Pdag;
use bed_mec::{MecSampler, SamplingMode};
use rand::seq::{index, SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::objective::{mean_oriented_gain, Objective};
use crate::separating::{generic_separating_system, graph_aware_separating_system};

/// Which separating system a menu-based selector draws candidates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemKind {
    /// [`generic_separating_system`] over all nodes; optionally every
    /// budget `k' <= k` is tried and the best batch kept.
    Generic {
        /// Try every smaller budget as well.
        all_budgets: bool,
    },
    /// [`graph_aware_separating_system`] of the essential graph.
    GraphAware,
}

impl SystemKind {
    /// Candidate systems to search, one per budget tried.
    pub fn systems(&self, cpdag: &Pdag, k: usize) -> Vec<Vec<Intervention>> {
        match *self {
            SystemKind::Generic { all_budgets: true } => (1..=k)
                .map(|budget| generic_separating_system(cpdag.num_nodes(), budget))
                .collect(),
            SystemKind::Generic { all_budgets: false } => {
                vec![generic_separating_system(cpdag.num_nodes(), k)]
            }
            SystemKind::GraphAware => vec![graph_aware_separating_system(cpdag, k)],
        }
    }
}

pub(crate) fn ensure_budget(k: usize) -> Result<(), BedError> {
    if k > 0 {
        return Ok(());
    }
    Err(BedError::Selection(
        ErrorInfo::new("invalid-budget", "interventions must allow at least one node")
            .with_hint("use k >= 1"),
    ))
}

/// Batch of `n_b` interventions, each a uniform draw of `min(k, |U|)` nodes
/// from the nodes `U` still incident to an undirected edge.
pub fn random_chordal_batch(
    cpdag: &Pdag,
    n_b: usize,
    k: usize,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let candidates: Vec<usize> = (0..cpdag.num_nodes())
        .filter(|&v| !cpdag.undirected_neighbors(v).is_empty())
        .collect();
    let size = k.min(candidates.len());
    Ok((0..n_b)
        .map(|_| {
            let mut intervention: Intervention = index::sample(rng, candidates.len(), size)
                .into_iter()
                .map(|idx| candidates[idx])
                .collect();
            intervention.sort_unstable();
            intervention
        })
        .collect())
}

/// Greedy batch of single-node interventions: each round draws `num_sample`
/// fresh members of the class and adds the unused node with the largest
/// mean gain.
pub fn ghassami_greedy(
    cpdag: &Pdag,
    n_b: usize,
    num_sample: usize,
    mode: SamplingMode,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    let n = cpdag.num_nodes();
    let mut sampler = MecSampler::new(cpdag, mode);
    let mut chosen: Vec<Intervention> = Vec::with_capacity(n_b);
    let mut used = vec![false; n];
    for _ in 0..n_b.min(n) {
        let dags = sampler.sample_many(num_sample.max(1), rng)?;
        let mut best: Option<(usize, f64)> = None;
        for v in (0..n).filter(|&v| !used[v]) {
            let mut trial = chosen.clone();
            trial.push(vec![v]);
            let score = mean_oriented_gain(cpdag, &dags, &trial);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((v, score));
            }
        }
        let Some((v, score)) = best else { break };
        debug!(node = v, score, "single-node greedy pick");
        used[v] = true;
        chosen.push(vec![v]);
    }
    Ok(chosen)
}

/// Plain greedy over the separating systems of `kind`: each round adds the
/// candidate maximising the objective of the extended batch (first maximum
/// wins). Returns the best batch over the systems tried.
pub fn greedy_separating_system<O: Objective + ?Sized>(
    cpdag: &Pdag,
    n_b: usize,
    k: usize,
    kind: SystemKind,
    objective: &O,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let mut best: Option<(Vec<Intervention>, f64)> = None;
    for system in kind.systems(cpdag, k) {
        let mut chosen: Vec<Intervention> = Vec::with_capacity(n_b);
        for _ in 0..n_b {
            let mut round: Option<(usize, f64)> = None;
            for (idx, candidate) in system.iter().enumerate() {
                let mut trial = chosen.clone();
                trial.push(candidate.clone());
                let score = objective.value(&trial);
                if round.map_or(true, |(_, top)| score > top) {
                    round = Some((idx, score));
                }
            }
            let Some((idx, _)) = round else { break };
            chosen.push(system[idx].clone());
        }
        let score = objective.value(&chosen);
        if best.as_ref().map_or(true, |(_, top)| score > *top) {
            best = Some((chosen, score));
        }
    }
    Ok(best.map(|(batch, _)| batch).unwrap_or_default())
}

/// Lazy greedy over the separating systems of `kind`.
///
/// Marginal gains are kept as stale upper bounds; each round re-evaluates
/// candidates in decreasing bound order and stops as soon as a fresh gain is
/// at least every remaining bound. Ties between the largest gains are broken
/// uniformly at random. An empty system yields random interventions.
pub fn lazy_greedy_separating_system<O: Objective + ?Sized>(
    cpdag: &Pdag,
    n_b: usize,
    k: usize,
    kind: SystemKind,
    objective: &O,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let mut best: Option<(Vec<Intervention>, f64)> = None;
    for system in kind.systems(cpdag, k) {
        if system.is_empty() {
            debug!("empty separating system, falling back to random interventions");
            return Ok(random_interventions(cpdag.num_nodes(), n_b, k, rng));
        }
        let chosen = lazy_greedy_over(&system, n_b, objective, rng);
        let score = objective.value(&chosen);
        debug!(candidates = system.len(), score, "lazy greedy over separating system");
        if best.as_ref().map_or(true, |(_, top)| score > *top) {
            best = Some((chosen, score));
        }
    }
    Ok(best.map(|(batch, _)| batch).unwrap_or_default())
}

fn lazy_greedy_over<O: Objective + ?Sized>(
    system: &[Intervention],
    n_b: usize,
    objective: &O,
    rng: &mut RngHandle,
) -> Vec<Intervention> {
    let mut bounds = vec![f64::INFINITY; system.len()];
    let mut chosen: Vec<Intervention> = Vec::with_capacity(n_b);
    let mut current = objective.value(&chosen);
    for _ in 0..n_b {
        for j in descending(&bounds) {
            let mut trial = chosen.clone();
            trial.push(system[j].clone());
            bounds[j] = objective.value(&trial) - current;
            if bounds[j] >= max_of(&bounds) {
                break;
            }
        }
        let top = max_of(&bounds);
        let ties: Vec<usize> = (0..bounds.len()).filter(|&j| bounds[j] == top).collect();
        let pick = ties.choose(rng).copied().unwrap_or(0);
        current += bounds[pick];
        chosen.push(system[pick].clone());
    }
    chosen
}

/// Lazy discrete random greedy.
///
/// Builds each of the `n_b` interventions in `k` steps. A step refreshes
/// marginal gains in decreasing stale-bound order until `k` fresh gains are
/// at least the next stale bound, then adds one of the `k` best candidates
/// uniformly at random. `2k` dummy candidates with zero gain let a step add
/// nothing.
pub fn lazy_discrete_random_greedy<O: Objective + ?Sized>(
    n: usize,
    n_b: usize,
    k: usize,
    objective: &O,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let mut chosen: Vec<Intervention> = Vec::with_capacity(n_b);
    for _ in 0..n_b {
        let baseline = objective.value(&chosen);
        let mut gains = vec![f64::INFINITY; n + 2 * k];
        let mut intervention: Intervention = Vec::with_capacity(k);
        let mut current = baseline;
        for _ in 0..k {
            let mut fresh: Vec<f64> = Vec::new();
            for j in descending(&gains) {
                if fresh.len() >= k && kth_largest(&fresh, k) >= gains[j] {
                    break;
                }
                if intervention.contains(&j) {
                    gains[j] = f64::NEG_INFINITY;
                    continue;
                }
                gains[j] = if j >= n {
                    0.0
                } else {
                    let mut extended = intervention.clone();
                    extended.push(j);
                    let mut trial = chosen.clone();
                    trial.push(extended);
                    objective.value(&trial) - current
                };
                fresh.push(gains[j]);
            }
            let order = descending(&gains);
            let top = &order[..k.min(order.len())];
            let Some(&pick) = top.choose(rng) else { break };
            current += gains[pick];
            if pick < n {
                intervention.push(pick);
                gains[pick] = f64::NEG_INFINITY;
            }
        }
        intervention.sort_unstable();
        debug!(?intervention, gain = current - baseline, "discrete random greedy pick");
        chosen.push(intervention);
    }
    Ok(chosen)
}

/// `n_b` interventions of `min(k, n)` distinct nodes drawn uniformly.
pub(crate) fn random_interventions(
    n: usize,
    n_b: usize,
    k: usize,
    rng: &mut RngHandle,
) -> Vec<Intervention> {
    (0..n_b)
        .map(|_| {
            let mut intervention = index::sample(rng, n, k.min(n)).into_vec();
            intervention.sort_unstable();
            intervention
        })
        .collect()
}

/// Indices sorted by decreasing value; equal values keep index order.
fn descending(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
    order
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn kth_largest(values: &[f64], k: usize) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    sorted[k - 1]
}
