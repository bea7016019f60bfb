//! Stochastic first and second order oracles for the multilinear extension
//! of the edge-orienting objective.

use std::collections::HashMap;

use bed_core::errors::{BedError, ErrorInfo};
use bed_core::rng::RngHandle;
use bed_graph::Pdag;
use bed_mec::{MecSampler, SamplingMode};
use rand::Rng;

use crate::ground::GroundSet;
use crate::objective::{EdgeOrientObjective, WeightedMember};

/// Where the oracle draws its scenarios from on every call.
#[derive(Debug, Clone)]
pub enum DagSource {
    /// Fresh members of an equivalence class, each weighted `1 / num_sample`.
    Mec {
        /// Sampler over the class.
        sampler: MecSampler,
        /// DAGs drawn per call.
        num_sample: usize,
    },
    /// One uniformly chosen scenario of a fixed bag, with its bag weight.
    Bag(EdgeOrientObjective),
}

impl DagSource {
    /// Source drawing `num_sample` members of the class of `cpdag` per call.
    pub fn mec(cpdag: &Pdag, num_sample: usize, mode: SamplingMode) -> Self {
        DagSource::Mec {
            sampler: MecSampler::new(cpdag, mode),
            num_sample,
        }
    }

    fn draw(&mut self, rng: &mut RngHandle) -> Result<Vec<WeightedMember>, BedError> {
        match self {
            DagSource::Mec {
                sampler,
                num_sample,
            } => {
                if *num_sample == 0 {
                    return Err(BedError::Selection(ErrorInfo::new(
                        "empty-bag",
                        "oracle must draw at least one DAG per call",
                    )));
                }
                let weight = 1.0 / *num_sample as f64;
                let pdag = sampler.pdag().clone();
                Ok(sampler
                    .sample_many(*num_sample, rng)?
                    .into_iter()
                    .map(|dag| WeightedMember {
                        pdag: pdag.clone(),
                        dag,
                        weight,
                    })
                    .collect())
            }
            DagSource::Bag(bag) => {
                let members = bag.members();
                if members.is_empty() {
                    return Ok(Vec::new());
                }
                Ok(vec![members[rng.gen_range(0..members.len())].clone()])
            }
        }
    }
}

/// Monte Carlo estimates of the gradient and Hessian of the multilinear
/// extension `F(x) = E[f(X)]`, `X_i ~ Bernoulli(x_i)`, where `f` counts the
/// edges a realised batch orients.
#[derive(Debug, Clone)]
pub struct StochasticOracle {
    source: DagSource,
    total_x: usize,
}

impl StochasticOracle {
    /// Oracle drawing scenarios from `source` and `total_x` random masks per
    /// scenario for every gradient estimate.
    pub fn new(source: DagSource, total_x: usize) -> Self {
        Self {
            source,
            total_x: total_x.max(1),
        }
    }

    /// Unbiased (up to the bag weighting) gradient estimate at `x`.
    ///
    /// Coordinate `v` is the score difference between the sampled mask with
    /// `v` forced in and forced out. Scores are memoised per mask within one
    /// scenario.
    pub fn gradient<G: GroundSet + ?Sized>(
        &mut self,
        ground: &G,
        x: &[f64],
        rng: &mut RngHandle,
    ) -> Result<Vec<f64>, BedError> {
        let m = ground.len();
        check_dimension(m, x.len())?;
        let mut grad = vec![0.0; m];
        for member in self.source.draw(rng)? {
            let mut memo: HashMap<Vec<bool>, usize> = HashMap::new();
            for _ in 0..self.total_x {
                let mask: Vec<bool> = x.iter().map(|&p| rng.gen_bool(p.clamp(0.0, 1.0))).collect();
                for v in 0..m {
                    let mut upper = mask.clone();
                    upper[v] = true;
                    let mut lower = mask.clone();
                    lower[v] = false;
                    let high = score(ground, &member, upper, &mut memo);
                    let low = score(ground, &member, lower, &mut memo);
                    grad[v] += member.weight * (high as f64 - low as f64) / self.total_x as f64;
                }
            }
        }
        Ok(grad)
    }

    /// Hessian estimate at `x` for the threshold vector `e`.
    ///
    /// With `S = {s : e_s < x_s}`, entry `(i, j)` for `i != j` is
    /// `f(S+i+j) - f(S+i-j) - f(S-i+j) + f(S-i-j)`; the diagonal is zero.
    pub fn hessian<G: GroundSet + ?Sized>(
        &mut self,
        ground: &G,
        x: &[f64],
        e: &[f64],
        rng: &mut RngHandle,
    ) -> Result<Vec<Vec<f64>>, BedError> {
        let m = ground.len();
        check_dimension(m, x.len())?;
        check_dimension(m, e.len())?;
        let base: Vec<bool> = x.iter().zip(e).map(|(&xs, &es)| es < xs).collect();
        let mut hess = vec![vec![0.0; m]; m];
        for member in self.source.draw(rng)? {
            let mut memo: HashMap<Vec<bool>, usize> = HashMap::new();
            for i in 0..m {
                for j in (i + 1)..m {
                    let mut corners = [0.0f64; 4];
                    for (slot, (with_i, with_j)) in
                        [(true, true), (true, false), (false, true), (false, false)]
                            .into_iter()
                            .enumerate()
                    {
                        let mut mask = base.clone();
                        mask[i] = with_i;
                        mask[j] = with_j;
                        corners[slot] = score(ground, &member, mask, &mut memo) as f64;
                    }
                    let entry = member.weight * (corners[0] - corners[1] - corners[2] + corners[3]);
                    hess[i][j] += entry;
                    hess[j][i] += entry;
                }
            }
        }
        Ok(hess)
    }
}

fn score<G: GroundSet + ?Sized>(
    ground: &G,
    member: &WeightedMember,
    mask: Vec<bool>,
    memo: &mut HashMap<Vec<bool>, usize>,
) -> usize {
    if let Some(&cached) = memo.get(&mask) {
        return cached;
    }
    let value = member.gain(&ground.realise(&mask));
    memo.insert(mask, value);
    value
}

fn check_dimension(expected: usize, actual: usize) -> Result<(), BedError> {
    if expected == actual {
        return Ok(());
    }
    Err(BedError::Selection(
        ErrorInfo::new("dimension-mismatch", "point does not match the ground set")
            .with_context("ground_set", expected)
            .with_context("point", actual),
    ))
}
