#![deny(missing_docs)]
#![doc = "Shared error, RNG and provenance types for the batched experiment design workspace."]

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{BedError, ErrorInfo};
pub use provenance::{RunProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};

/// A single experiment: the set of variables perturbed together.
///
/// Node indices are kept sorted and free of duplicates by the selection
/// routines, but consumers must not rely on that for correctness.
pub type Intervention = Vec<usize>;
