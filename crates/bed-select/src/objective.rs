//! Set functions over intervention batches.

use bed_core::errors::{BedError, ErrorInfo};
use bed_core::rng::RngHandle;
use bed_core::Intervention;
use bed_graph::{orient_from_interventions, oriented_gain, Dag, Pdag};
use bed_mec::{MecSampler, SamplingMode};
use rayon::prelude::*;

/// A set function scored on a batch of interventions.
pub trait Objective {
    /// Value of performing every intervention in `interventions`.
    fn value(&self, interventions: &[Intervention]) -> f64;
}

/// One scenario of a weighted bag: the graph known before experimenting,
/// the DAG assumed to be true and its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedMember {
    /// Partially directed graph the interventions start from.
    pub pdag: Pdag,
    /// Ground truth used to orient crossing edges.
    pub dag: Dag,
    /// Non-negative weight of the scenario.
    pub weight: f64,
}

impl WeightedMember {
    /// Edges of `pdag` oriented by `interventions` when `dag` is the truth.
    pub fn gain(&self, interventions: &[Intervention]) -> usize {
        oriented_gain(&self.dag, &self.pdag, interventions)
    }
}

/// Expected number of newly oriented edges over a weighted bag of scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeOrientObjective {
    members: Vec<WeightedMember>,
}

impl EdgeOrientObjective {
    /// Draws `num_samples` members of the class of `cpdag`, each weighted
    /// `1 / num_samples`.
    pub fn sampled(
        cpdag: &Pdag,
        num_samples: usize,
        mode: SamplingMode,
        rng: &mut RngHandle,
    ) -> Result<Self, BedError> {
        if num_samples == 0 {
            return Err(BedError::Selection(
                ErrorInfo::new("empty-bag", "objective needs at least one sampled DAG")
                    .with_hint("raise objective_samples above zero"),
            ));
        }
        let mut sampler = MecSampler::new(cpdag, mode);
        let dags = sampler.sample_many(num_samples, rng)?;
        Self::from_dags(cpdag, dags)
    }

    /// Uniformly weighted bag over the given DAGs, all starting from `cpdag`.
    pub fn from_dags(cpdag: &Pdag, dags: Vec<Dag>) -> Result<Self, BedError> {
        if dags.is_empty() {
            return Err(BedError::Selection(ErrorInfo::new(
                "empty-bag",
                "objective needs at least one DAG",
            )));
        }
        let weight = 1.0 / dags.len() as f64;
        let members = dags
            .into_iter()
            .map(|dag| WeightedMember {
                pdag: cpdag.clone(),
                dag,
                weight,
            })
            .collect();
        Ok(Self { members })
    }

    /// Bag built from parallel lists of starting graphs, weights and DAGs.
    pub fn weighted(pdags: Vec<Pdag>, weights: Vec<f64>, dags: Vec<Dag>) -> Result<Self, BedError> {
        Ok(Self {
            members: zip_members(pdags, weights, dags)?,
        })
    }

    /// Scenarios of the bag.
    pub fn members(&self) -> &[WeightedMember] {
        &self.members
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true when the bag holds no scenario.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Objective for EdgeOrientObjective {
    fn value(&self, interventions: &[Intervention]) -> f64 {
        self.members
            .iter()
            .map(|member| member.weight * member.gain(interventions) as f64)
            .sum()
    }
}

/// Mutual information between the intervention outcome and the true DAG,
/// in bits, for a weighted bag of scenarios.
///
/// Two scenarios are indistinguishable after the batch when they started from
/// the same graph and the batch leaves them with the same essential graph.
#[derive(Debug, Clone, PartialEq)]
pub struct MutualInfoObjective {
    members: Vec<WeightedMember>,
}

impl MutualInfoObjective {
    /// Bag built from parallel lists of starting graphs, weights and DAGs.
    pub fn new(pdags: Vec<Pdag>, weights: Vec<f64>, dags: Vec<Dag>) -> Result<Self, BedError> {
        Ok(Self {
            members: zip_members(pdags, weights, dags)?,
        })
    }

    /// Scenarios of the bag.
    pub fn members(&self) -> &[WeightedMember] {
        &self.members
    }
}

impl Objective for MutualInfoObjective {
    fn value(&self, interventions: &[Intervention]) -> f64 {
        let weights: Vec<f64> = self.members.iter().map(|m| m.weight).collect();
        let outcomes: Vec<Pdag> = self
            .members
            .iter()
            .map(|member| {
                let mut pdag = member.pdag.clone();
                orient_from_interventions(&member.dag, &mut pdag, interventions);
                pdag
            })
            .collect();

        let mut value = entropy_bits(&weights);
        for (i, member) in self.members.iter().enumerate() {
            let conditional: Vec<f64> = self
                .members
                .iter()
                .enumerate()
                .map(|(j, other)| {
                    let consistent = j == i
                        || (other.pdag == member.pdag && outcomes[j] == outcomes[i]);
                    if consistent {
                        other.weight
                    } else {
                        0.0
                    }
                })
                .collect();
            value -= member.weight * entropy_bits(&conditional);
        }
        value
    }
}

/// Mean oriented gain of `interventions` over `dags`, all starting from
/// `cpdag`. Integer gains are summed before dividing, so the result does not
/// depend on the order the parallel map finishes in.
pub fn mean_oriented_gain(cpdag: &Pdag, dags: &[Dag], interventions: &[Intervention]) -> f64 {
    if dags.is_empty() {
        return 0.0;
    }
    let total: usize = dags
        .par_iter()
        .map(|dag| oriented_gain(dag, cpdag, interventions))
        .sum();
    total as f64 / dags.len() as f64
}

/// Shannon entropy in bits of the normalised `weights`.
fn entropy_bits(weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    weights
        .iter()
        .filter(|&&w| w > 0.0)
        .map(|&w| {
            let p = w / total;
            -p * p.log2()
        })
        .sum()
}

fn zip_members(
    pdags: Vec<Pdag>,
    weights: Vec<f64>,
    dags: Vec<Dag>,
) -> Result<Vec<WeightedMember>, BedError> {
    if pdags.len() != weights.len() || pdags.len() != dags.len() {
        return Err(BedError::Selection(
            ErrorInfo::new("bag-mismatch", "graphs, weights and DAGs differ in length")
                .with_context("pdags", pdags.len())
                .with_context("weights", weights.len())
                .with_context("dags", dags.len()),
        ));
    }
    if pdags.is_empty() {
        return Err(BedError::Selection(ErrorInfo::new(
            "empty-bag",
            "objective needs at least one scenario",
        )));
    }
    if let Some(weight) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(BedError::Selection(
            ErrorInfo::new("invalid-weight", "scenario weights must be finite and non-negative")
                .with_context("weight", weight),
        ));
    }
    Ok(pdags
        .into_iter()
        .zip(weights)
        .zip(dags)
        .map(|((pdag, weight), dag)| WeightedMember { pdag, dag, weight })
        .collect())
}
