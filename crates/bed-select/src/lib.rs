#![deny(missing_docs)]

//! Batch intervention selection.
//!
//! Objectives score a batch of interventions against a bag of scenarios
//! (starting graph, assumed truth, weight). Selectors build batches of at
//! most `n_b` interventions with at most `k` nodes each, either greedily
//! over separating systems or by rounding a continuous relaxation driven by
//! [`StochasticOracle`] gradient and Hessian estimates.

mod continuous;
mod greedy;
mod ground;
mod objective;
mod oracle;
mod separating;

pub use continuous::{
    continuous_greedy_menu, linear_maximization, pipage_round, scg_plus_plus, scg_plus_plus_menu,
    stochastic_continuous_greedy, ContinuousParams,
};
pub use greedy::{
    ghassami_greedy, greedy_separating_system, lazy_discrete_random_greedy,
    lazy_greedy_separating_system, random_chordal_batch, SystemKind,
};
pub use ground::{GroundSet, InterventionMenu, PerturbationTargets};
pub use objective::{
    mean_oriented_gain, EdgeOrientObjective, MutualInfoObjective, Objective, WeightedMember,
};
pub use oracle::{DagSource, StochasticOracle};
pub use separating::{generic_separating_system, graph_aware_separating_system};
