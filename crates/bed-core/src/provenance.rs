//! Records stored next to experiment results so a report can be traced back
//! to its configuration, seed and ground truths.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout version of graph files and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Bumped when older readers can no longer load the payload.
    pub major: u32,
    /// Bumped when fields are added.
    pub minor: u32,
    /// Bumped for fixes that leave the layout unchanged.
    pub patch: u32,
}

impl SchemaVersion {
    /// `major.minor.patch`.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Where a report came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Layout of the enclosing report.
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// SHA-256 of the experiment configuration and seed.
    pub input_hash: String,
    /// Canonical hash of each repeat's true DAG, in repeat order.
    #[serde(default)]
    pub graph_hashes: Vec<String>,
    /// Seed every substream was derived from.
    pub seed: u64,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Crate name to version.
    pub tool_versions: BTreeMap<String, String>,
}
