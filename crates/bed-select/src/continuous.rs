//! Continuous relaxations: stochastic continuous greedy, its Hessian-corrected
//! variant and randomized pipage rounding back to a discrete batch.

use bed_core::errors::BedError;
use bed_core::rng::RngHandle;
use bed_core::Intervention;
use bed_graph::Pdag;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::greedy::{ensure_budget, SystemKind};
use crate::ground::{selected, GroundSet, InterventionMenu, PerturbationTargets};
use crate::objective::Objective;
use crate::oracle::StochasticOracle;

const ROUNDING_EPSILON: f64 = 1e-3;

/// Step counts and minibatch sizes of the continuous selectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousParams {
    /// Frank-Wolfe iterations `T`.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Gradient estimates averaged at the first step (`M0`).
    #[serde(default = "default_minibatch")]
    pub initial_batch: usize,
    /// Hessian estimates averaged at every later step (`M`).
    #[serde(default = "default_minibatch")]
    pub hessian_batch: usize,
    /// Pipage roundings drawn; the best rounding is kept.
    #[serde(default = "default_roundings")]
    pub roundings: usize,
}

fn default_iterations() -> usize {
    5
}

fn default_minibatch() -> usize {
    5
}

fn default_roundings() -> usize {
    11
}

impl Default for ContinuousParams {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            initial_batch: default_minibatch(),
            hessian_batch: default_minibatch(),
            roundings: default_roundings(),
        }
    }
}

/// Solves `max <g, v>` over `{sum(v) <= budget, 0 <= v_i <= caps_i}` by
/// filling the largest positive coordinates first.
pub fn linear_maximization(gradient: &[f64], budget: f64, caps: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..gradient.len()).filter(|&i| gradient[i] > 0.0).collect();
    order.sort_by(|&a, &b| gradient[b].total_cmp(&gradient[a]));
    let mut direction = vec![0.0; gradient.len()];
    let mut remaining = budget.max(0.0);
    for i in order {
        if remaining <= 0.0 {
            break;
        }
        let step = caps[i].clamp(0.0, 1.0).min(remaining);
        direction[i] = step;
        remaining -= step;
    }
    direction
}

/// Randomized pipage rounding of `x` towards an integral vector under the
/// budget `k`.
///
/// Pairs of fractional coordinates are moved in opposite directions until one
/// hits a bound, which keeps the sum fixed. A single leftover fractional
/// coordinate is dropped when the sum slightly exceeds `k`, set when nothing
/// beyond it is chosen yet, and drawn as a Bernoulli of its value otherwise.
pub fn pipage_round(x: &[f64], k: usize, rng: &mut RngHandle) -> Vec<bool> {
    let mut x: Vec<f64> = x.iter().map(|&v| (v * 1e10).round() / 1e10).collect();
    let mut fractional: Vec<usize> = (0..x.len()).filter(|&i| x[i] != x[i].round()).collect();

    while fractional.len() > 1 {
        let picks = index::sample(rng, fractional.len(), 2);
        let (i, j) = (fractional[picks.index(0)], fractional[picks.index(1)]);
        let towards_i = (1.0 - x[i]).min(x[j]);
        let towards_j = (1.0 - x[j]).min(x[i]);
        let p = (towards_i / (towards_i + towards_j)).abs();
        let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.5 };
        if rng.gen_bool(p) {
            x[i] -= towards_j;
            x[j] += towards_j;
        } else {
            x[i] += towards_i;
            x[j] -= towards_i;
        }
        for idx in [i, j] {
            if (x[idx] - 1.0).abs() < ROUNDING_EPSILON || x[idx].abs() < ROUNDING_EPSILON {
                x[idx] = x[idx].round();
                fractional.retain(|&f| f != idx);
            }
        }
    }

    if let Some(&last) = fractional.first() {
        let total: f64 = x.iter().sum();
        let k = k as f64;
        x[last] = if total > k && total < k + 0.1 {
            0.0
        } else if total <= 1.0 {
            1.0
        } else if rng.gen_bool(x[last].clamp(0.0, 1.0)) {
            1.0
        } else {
            0.0
        };
    }
    x.into_iter().map(|v| v >= 0.5).collect()
}

/// Stochastic continuous greedy over node subsets, one intervention at a
/// time.
///
/// Each intervention runs `T` Frank-Wolfe steps on momentum-averaged
/// stochastic gradients (`rho_t = 4 / (t + 8)^(2/3)`) over
/// `{sum(x) <= k, 0 <= x <= 1}` and keeps the best of the pipage roundings.
pub fn stochastic_continuous_greedy<O: Objective + ?Sized>(
    n: usize,
    n_b: usize,
    k: usize,
    objective: &O,
    oracle: &mut StochasticOracle,
    params: &ContinuousParams,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let steps = params.iterations.max(1) as f64;
    let mut chosen: Vec<Intervention> = Vec::with_capacity(n_b);
    for _ in 0..n_b {
        let ground = PerturbationTargets::new(n, &chosen);
        let mut x = vec![0.0; n];
        let mut momentum = vec![0.0; n];
        for t in 0..params.iterations {
            let rho = 4.0 / ((t + 8) as f64).powf(2.0 / 3.0);
            let grad = oracle.gradient(&ground, &x, rng)?;
            for (d, g) in momentum.iter_mut().zip(&grad) {
                *d = (1.0 - rho) * *d + rho * g;
            }
            let caps: Vec<f64> = x.iter().map(|&xi| 1.0 - xi).collect();
            let direction = linear_maximization(&momentum, k as f64, &caps);
            for (xi, vi) in x.iter_mut().zip(&direction) {
                *xi += vi / steps;
            }
        }
        let intervention = best_rounding(&ground, &x, k, objective, params.roundings, rng)
            .pop()
            .unwrap_or_default();
        chosen.push(intervention);
    }
    Ok(chosen)
}

/// Stochastic continuous greedy++ over node subsets, one intervention at a
/// time.
///
/// The first step averages `M0` gradient estimates; later steps update the
/// gradient with `H (x_t - x_{t-1})`, `H` averaged over `M` Hessian estimates
/// at random points of the segment between the last two iterates.
pub fn scg_plus_plus<O: Objective + ?Sized>(
    n: usize,
    n_b: usize,
    k: usize,
    objective: &O,
    oracle: &mut StochasticOracle,
    params: &ContinuousParams,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let mut chosen: Vec<Intervention> = Vec::with_capacity(n_b);
    for _ in 0..n_b {
        let ground = PerturbationTargets::new(n, &chosen);
        let x = hessian_ascent(&ground, k as f64, true, oracle, params, rng)?;
        let intervention = best_rounding(&ground, &x, k, objective, params.roundings, rng)
            .pop()
            .unwrap_or_default();
        chosen.push(intervention);
    }
    Ok(chosen)
}

/// Stochastic continuous greedy++ choosing up to `n_b` interventions from a
/// separating system. A system with at most `n_b` members is returned whole.
#[allow(clippy::too_many_arguments)]
pub fn scg_plus_plus_menu<O: Objective + ?Sized>(
    cpdag: &Pdag,
    n_b: usize,
    k: usize,
    kind: SystemKind,
    objective: &O,
    oracle: &mut StochasticOracle,
    params: &ContinuousParams,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let menu = primary_system(kind, cpdag, k);
    if menu.len() <= n_b {
        return Ok(menu);
    }
    let ground = InterventionMenu::new(&menu);
    let x = hessian_ascent(&ground, n_b as f64, false, oracle, params, rng)?;
    let x = rescale_to_budget(x, n_b);
    debug!(candidates = menu.len(), "continuous greedy++ over separating system");
    Ok(best_rounding(&ground, &x, n_b, objective, params.roundings, rng))
}

/// Stochastic continuous greedy choosing up to `n_b` interventions from the
/// graph-aware separating system. A system with at most `n_b` members is
/// returned whole.
pub fn continuous_greedy_menu<O: Objective + ?Sized>(
    cpdag: &Pdag,
    n_b: usize,
    k: usize,
    objective: &O,
    oracle: &mut StochasticOracle,
    params: &ContinuousParams,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    ensure_budget(k)?;
    let menu = primary_system(SystemKind::GraphAware, cpdag, k);
    if menu.len() <= n_b {
        return Ok(menu);
    }
    let ground = InterventionMenu::new(&menu);
    let m = menu.len();
    let steps = params.iterations.max(1) as f64;
    let caps = vec![1.0; m];
    let mut x = vec![0.0; m];
    let mut momentum = vec![0.0; m];
    for t in 0..params.iterations {
        let rho = 4.0 / ((t + 8) as f64).powf(2.0 / 3.0);
        let grad = oracle.gradient(&ground, &x, rng)?;
        for (d, g) in momentum.iter_mut().zip(&grad) {
            *d = (1.0 - rho) * *d + rho * g;
        }
        let direction = linear_maximization(&momentum, n_b as f64, &caps);
        for (xi, vi) in x.iter_mut().zip(&direction) {
            *xi += vi / steps;
        }
    }
    let x = rescale_to_budget(x, n_b);
    Ok(best_rounding(&ground, &x, n_b, objective, params.roundings, rng))
}

/// Runs the Hessian-corrected ascent and returns the final iterate.
/// `shrinking_caps` bounds each step by `1 - x` instead of `1`.
fn hessian_ascent<G: GroundSet + ?Sized>(
    ground: &G,
    budget: f64,
    shrinking_caps: bool,
    oracle: &mut StochasticOracle,
    params: &ContinuousParams,
    rng: &mut RngHandle,
) -> Result<Vec<f64>, BedError> {
    let m = ground.len();
    let steps = params.iterations.max(1) as f64;
    let mut x = vec![0.0; m];
    let mut previous = vec![0.0; m];
    let mut grad = vec![0.0; m];
    for t in 1..params.iterations {
        if t == 1 {
            let batch = params.initial_batch.max(1);
            for _ in 0..batch {
                let estimate = oracle.gradient(ground, &x, rng)?;
                for (g, e) in grad.iter_mut().zip(&estimate) {
                    *g += e / batch as f64;
                }
            }
        } else {
            let batch = params.hessian_batch.max(1);
            let mut hess = vec![vec![0.0; m]; m];
            for _ in 0..batch {
                let a: f64 = rng.gen();
                let e: Vec<f64> = (0..m).map(|_| rng.gen()).collect();
                let point: Vec<f64> = x
                    .iter()
                    .zip(&previous)
                    .map(|(&cur, &prev)| a * cur + (1.0 - a) * prev)
                    .collect();
                let estimate = oracle.hessian(ground, &point, &e, rng)?;
                for (row, est) in hess.iter_mut().zip(&estimate) {
                    for (h, v) in row.iter_mut().zip(est) {
                        *h += v / batch as f64;
                    }
                }
            }
            let delta: Vec<f64> = x.iter().zip(&previous).map(|(c, p)| c - p).collect();
            for (g, row) in grad.iter_mut().zip(&hess) {
                *g += row.iter().zip(&delta).map(|(h, d)| h * d).sum::<f64>();
            }
        }
        let caps: Vec<f64> = if shrinking_caps {
            x.iter().map(|&xi| 1.0 - xi).collect()
        } else {
            vec![1.0; m]
        };
        let direction = linear_maximization(&grad, budget, &caps);
        previous.clone_from(&x);
        for (xi, vi) in x.iter_mut().zip(&direction) {
            *xi += vi / steps;
        }
    }
    Ok(x)
}

fn primary_system(kind: SystemKind, cpdag: &Pdag, k: usize) -> Vec<Intervention> {
    let kind = match kind {
        SystemKind::Generic { .. } => SystemKind::Generic { all_budgets: false },
        other => other,
    };
    kind.systems(cpdag, k).pop().unwrap_or_default()
}

/// Scales `x` to total mass `budget`, capped at one per coordinate.
fn rescale_to_budget(x: Vec<f64>, budget: usize) -> Vec<f64> {
    let norm: f64 = x.iter().map(|v| v.abs()).sum();
    if norm <= 0.0 {
        return x;
    }
    x.into_iter()
        .map(|v| (v / norm * budget as f64).min(1.0))
        .collect()
}

/// Best batch over `roundings` pipage roundings of `x`; at most `budget`
/// elements are selected.
fn best_rounding<G: GroundSet + ?Sized, O: Objective + ?Sized>(
    ground: &G,
    x: &[f64],
    budget: usize,
    objective: &O,
    roundings: usize,
    rng: &mut RngHandle,
) -> Vec<Intervention> {
    let mut best: Option<(Vec<Intervention>, f64)> = None;
    for _ in 0..roundings.max(1) {
        let mut mask = pipage_round(x, budget, rng);
        for idx in selected(&mask).into_iter().skip(budget) {
            mask[idx] = false;
        }
        let batch = ground.realise(&mask);
        let score = objective.value(&batch);
        if best.as_ref().map_or(true, |(_, top)| score > *top) {
            best = Some((batch, score));
        }
    }
    best.map(|(batch, _)| batch).unwrap_or_default()
}
