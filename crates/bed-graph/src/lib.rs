#![deny(missing_docs)]

//! Directed acyclic graphs, partially directed essential graphs and the
//! orientation machinery (Meek rules, hard interventions) used to score
//! intervention batches.
//!
//! A [`Pdag`] stores one [`Mark`] per ordered pair: `Directed` at `(u, v)`
//! means `u -> v`, `Undirected` is stored on both `(u, v)` and `(v, u)`.

mod dag;
mod generators;
mod hash;
mod meek;
mod orient;
mod pdag;
mod serialization;

pub use dag::Dag;
pub use generators::{
    barabasi_albert, bipartite_erdos_renyi, chain_no_colliders, chain_random_directions,
    chain_with_root, erdos_renyi, fully_connected, k_star_forest, scale_free, uniform_random_tree,
};
pub use hash::{canonical_dag_hash, canonical_pdag_hash};
pub use meek::{meek_closure, meek_closure_from};
pub use orient::{observational_essential_graph, orient_from_interventions, oriented_gain};
pub use pdag::{Mark, Pdag};
pub use serialization::{
    dag_from_bytes, dag_from_json, dag_to_bytes, dag_to_json, pdag_from_json, pdag_to_json,
};
