#![deny(missing_docs)]

//! Size, uniform sampling and enumeration of the DAGs represented by an
//! essential graph.
//!
//! The class factorises over the undirected chain components of the graph.
//! Each component is a chordal undirected graph and every acyclic moral
//! orientation (AMO) of it has exactly one source, so the orientations
//! partition by their root. Orienting every edge out of a root and closing
//! under the Meek rules leaves smaller chordal components, which gives the
//! recursion used for counting, sampling and enumeration alike.

mod count;
mod enumerate;
mod sample;

pub use count::{mec_size, MecCounter};
pub use enumerate::enumerate_dags;
pub use sample::{MecSampler, SamplingMode};
