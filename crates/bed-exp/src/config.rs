use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bed_core::errors::{BedError, ErrorInfo};
use bed_mec::SamplingMode;
use bed_select::ContinuousParams;
use serde::{Deserialize, Serialize};

/// Ground-truth generator, written in YAML and on the command line with its
/// historical name (`chain`, `tree`, `ER_0.25`, `barabasi_albert_2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeneratorSpec {
    /// Chain rooted at a uniformly random node.
    Chain,
    /// Uniform random tree oriented away from a random root.
    Tree,
    /// Bipartite Erdos-Renyi graph over two halves, edge probability 0.5.
    Bipartite,
    /// Erdos-Renyi graph with edge probability `p` under a random order.
    ErdosRenyi {
        /// Edge probability.
        p: f64,
    },
    /// Complete DAG.
    FullyConnected,
    /// Barabasi-Albert preferential attachment with `m` edges per new node.
    BarabasiAlbert {
        /// Edges added with each new node.
        m: usize,
    },
    /// Forest of stars sized by the largest intervention budget.
    KStar,
    /// DREAM in-silico gold standard network `index` (1 to 5).
    Dream {
        /// Network index.
        index: usize,
    },
    /// Directed scale-free growth.
    ScaleFree {
        /// Probability of attaching a new node with an out-edge.
        alpha: f64,
        /// Probability of adding an edge between existing nodes.
        beta: f64,
    },
}

/// DREAM network names, indexed by `GeneratorSpec::Dream::index - 1`.
pub const DREAM_NETWORKS: [&str; 5] = ["Ecoli1", "Ecoli2", "Yeast1", "Yeast2", "Yeast3"];

impl GeneratorSpec {
    /// Whether drawn graphs are filtered by equivalence class size.
    pub fn filters_by_mec_size(&self) -> bool {
        !matches!(
            self,
            GeneratorSpec::Chain
                | GeneratorSpec::Tree
                | GeneratorSpec::KStar
                | GeneratorSpec::FullyConnected
                | GeneratorSpec::Dream { .. }
        )
    }

    /// Whether the ground truth is a fixed network scored against itself
    /// rather than against its whole equivalence class.
    pub fn is_dream(&self) -> bool {
        matches!(self, GeneratorSpec::Dream { .. })
    }

    /// Gold-standard file name of a DREAM network.
    pub fn dream_file(&self) -> Option<String> {
        match self {
            GeneratorSpec::Dream { index } => DREAM_NETWORKS
                .get(index.wrapping_sub(1))
                .map(|cell| format!("InSilicoSize50-{cell}_goldstandard_signed.tsv")),
            _ => None,
        }
    }
}

impl fmt::Display for GeneratorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorSpec::Chain => write!(f, "chain"),
            GeneratorSpec::Tree => write!(f, "tree"),
            GeneratorSpec::Bipartite => write!(f, "bipartite"),
            GeneratorSpec::ErdosRenyi { p } => write!(f, "ER_{p}"),
            GeneratorSpec::FullyConnected => write!(f, "fully_connected"),
            GeneratorSpec::BarabasiAlbert { m } => write!(f, "barabasi_albert_{m}"),
            GeneratorSpec::KStar => write!(f, "kstar"),
            GeneratorSpec::Dream { index } => write!(f, "dream_{index}"),
            GeneratorSpec::ScaleFree { alpha, beta } => write!(f, "scale_free_{alpha}_{beta}"),
        }
    }
}

impl FromStr for GeneratorSpec {
    type Err = BedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            BedError::Config(
                ErrorInfo::new("unknown-generator", "generator name not recognised")
                    .with_context("generator", s)
                    .with_hint(
                        "use chain, tree, bipartite, ER_<p>, fully_connected, \
                         barabasi_albert_<m>, kstar, dream_<1-5> or scale_free[_<alpha>_<beta>]",
                    ),
            )
        };
        let spec = match s {
            "chain" => GeneratorSpec::Chain,
            "tree" => GeneratorSpec::Tree,
            "bipartite" => GeneratorSpec::Bipartite,
            "fully_connected" => GeneratorSpec::FullyConnected,
            "kstar" => GeneratorSpec::KStar,
            "scale_free" => GeneratorSpec::ScaleFree {
                alpha: 0.41,
                beta: 0.54,
            },
            _ => {
                if let Some(p) = s.strip_prefix("ER_") {
                    GeneratorSpec::ErdosRenyi {
                        p: p.parse().map_err(|_| invalid())?,
                    }
                } else if let Some(m) = s.strip_prefix("barabasi_albert_") {
                    GeneratorSpec::BarabasiAlbert {
                        m: m.parse().map_err(|_| invalid())?,
                    }
                } else if let Some(index) = s.strip_prefix("dream_") {
                    let index: usize = index.parse().map_err(|_| invalid())?;
                    if !(1..=DREAM_NETWORKS.len()).contains(&index) {
                        return Err(invalid());
                    }
                    GeneratorSpec::Dream { index }
                } else if let Some(params) = s.strip_prefix("scale_free_") {
                    let (alpha, beta) = params.split_once('_').ok_or_else(invalid)?;
                    GeneratorSpec::ScaleFree {
                        alpha: alpha.parse().map_err(|_| invalid())?,
                        beta: beta.parse().map_err(|_| invalid())?,
                    }
                } else {
                    return Err(invalid());
                }
            }
        };
        Ok(spec)
    }
}

impl TryFrom<String> for GeneratorSpec {
    type Error = BedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GeneratorSpec> for String {
    fn from(spec: GeneratorSpec) -> Self {
        spec.to_string()
    }
}

/// Selection method compared by an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Random nodes next to undirected edges.
    Rand,
    /// Lazy greedy over the structure-agnostic separating system.
    SsA,
    /// Lazy greedy over the graph-aware separating system.
    SsB,
    /// Continuous greedy++ over the structure-agnostic separating system.
    SsACont,
    /// Continuous greedy++ over the graph-aware separating system.
    SsBCont,
    /// Continuous greedy++ over node subsets.
    Cont,
    /// Lazy discrete random greedy.
    Drg,
    /// Single-node greedy on fresh class samples.
    Greedy,
    /// Stochastic continuous greedy over node subsets.
    Scg,
}

impl Method {
    /// Every method, in report order.
    pub const ALL: [Method; 9] = [
        Method::Rand,
        Method::SsA,
        Method::SsB,
        Method::SsACont,
        Method::SsBCont,
        Method::Cont,
        Method::Drg,
        Method::Greedy,
        Method::Scg,
    ];

    /// Name used in result keys and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Rand => "rand",
            Method::SsA => "ss_a",
            Method::SsB => "ss_b",
            Method::SsACont => "ss_a_cont",
            Method::SsBCont => "ss_b_cont",
            Method::Cont => "cont",
            Method::Drg => "drg",
            Method::Greedy => "greedy",
            Method::Scg => "scg",
        }
    }

    /// Methods run once at the largest batch size and scored on every prefix.
    pub fn scores_prefixes(&self) -> bool {
        matches!(self, Method::SsA | Method::SsB | Method::Cont | Method::Drg)
    }

    /// Methods whose value at `k` may fall back to the best smaller budget.
    pub fn keeps_best_smaller_budget(&self) -> bool {
        matches!(self, Method::SsA | Method::SsACont)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = BedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| {
                BedError::Config(
                    ErrorInfo::new("unknown-method", "selection method not recognised")
                        .with_context("method", s),
                )
            })
    }
}

/// Acceptance window on the equivalence class size of drawn ground truths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MecFilter {
    /// Apply the window at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Smallest accepted size; defaults to 10 up to 20 nodes and 20 above.
    #[serde(default)]
    pub lower: Option<u64>,
    /// Largest accepted size.
    #[serde(default = "default_upper")]
    pub upper: u64,
}

fn default_true() -> bool {
    true
}

fn default_upper() -> u64 {
    100
}

impl Default for MecFilter {
    fn default() -> Self {
        Self {
            enabled: true,
            lower: None,
            upper: default_upper(),
        }
    }
}

impl MecFilter {
    /// Inclusive size window for graphs on `nodes` nodes.
    pub fn bounds(&self, nodes: usize) -> (u64, u64) {
        let lower = self.lower.unwrap_or(if nodes <= 20 { 10 } else { 20 });
        (lower, self.upper)
    }
}

/// Settings of the continuous selectors and their stochastic oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousSettings {
    /// Iterations and minibatches of the node-subset selectors.
    #[serde(default)]
    pub params: ContinuousParams,
    /// Iterations per batch slot for the separating-system selectors
    /// (`T = iterations_per_batch * b`).
    #[serde(default = "default_iterations_per_batch")]
    pub iterations_per_batch: usize,
    /// Class members drawn by the oracle per estimate.
    #[serde(default = "default_one")]
    pub oracle_samples: usize,
    /// Random masks per drawn member in gradient estimates.
    #[serde(default = "default_one")]
    pub oracle_masks: usize,
    /// Sampler used by the oracle.
    #[serde(default = "default_oracle_mode")]
    pub oracle_mode: SamplingMode,
}

fn default_iterations_per_batch() -> usize {
    5
}

fn default_one() -> usize {
    1
}

fn default_oracle_mode() -> SamplingMode {
    SamplingMode::Fast
}

impl Default for ContinuousSettings {
    fn default() -> Self {
        Self {
            params: ContinuousParams::default(),
            iterations_per_batch: default_iterations_per_batch(),
            oracle_samples: default_one(),
            oracle_masks: default_one(),
            oracle_mode: default_oracle_mode(),
        }
    }
}

/// What a selector needs beyond the graph and its budgets; taken from an
/// [`ExperimentConfig`] or built by the `select` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionSettings {
    /// Class members in the objective the selectors optimise.
    pub objective_samples: usize,
    /// Continuous selector settings.
    pub continuous: ContinuousSettings,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            objective_samples: default_objective_samples(),
            continuous: ContinuousSettings::default(),
        }
    }
}

/// YAML-configurable description of one experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Prefix of the written result files.
    #[serde(default = "default_name")]
    pub name: String,
    /// Number of nodes of each ground truth.
    pub nodes: usize,
    /// Ground-truth generator.
    pub generator: GeneratorSpec,
    /// Methods compared.
    pub methods: Vec<Method>,
    /// Intervention sizes `k`, ascending.
    pub k_range: Vec<usize>,
    /// Batch sizes `b`, ascending.
    #[serde(default = "default_b_range")]
    pub b_range: Vec<usize>,
    /// Ground truths drawn.
    #[serde(default = "default_repeats")]
    pub repeats: usize,
    /// Class members in the objective the selectors optimise.
    #[serde(default = "default_objective_samples")]
    pub objective_samples: usize,
    /// Rejection window on class sizes.
    #[serde(default)]
    pub mec_filter: MecFilter,
    /// Largest class scored exactly; larger classes are scored on a uniform
    /// sample of this many members.
    #[serde(default = "default_max_enumeration")]
    pub max_enumeration: u64,
    /// Rejected draws tolerated per repeat before giving up.
    #[serde(default = "default_max_draws")]
    pub max_draws: usize,
    /// Continuous selector settings.
    #[serde(default)]
    pub continuous: ContinuousSettings,
    /// Directory holding the DREAM gold-standard files.
    #[serde(default)]
    pub dream_dir: Option<PathBuf>,
}

fn default_name() -> String {
    "experiment".to_string()
}

fn default_b_range() -> Vec<usize> {
    vec![1, 2, 3, 4, 5]
}

fn default_repeats() -> usize {
    10
}

fn default_objective_samples() -> usize {
    40
}

fn default_max_enumeration() -> u64 {
    10_000
}

fn default_max_draws() -> usize {
    10_000
}

impl ExperimentConfig {
    /// Configuration with every optional field at its default.
    pub fn new(nodes: usize, generator: GeneratorSpec, methods: Vec<Method>, k_range: Vec<usize>) -> Self {
        Self {
            name: default_name(),
            nodes,
            generator,
            methods,
            k_range,
            b_range: default_b_range(),
            repeats: default_repeats(),
            objective_samples: default_objective_samples(),
            mec_filter: MecFilter::default(),
            max_enumeration: default_max_enumeration(),
            max_draws: default_max_draws(),
            continuous: ContinuousSettings::default(),
            dream_dir: None,
        }
    }

    /// Selector settings shared by every method of the experiment.
    pub fn selection_settings(&self) -> SelectionSettings {
        SelectionSettings {
            objective_samples: self.objective_samples,
            continuous: self.continuous,
        }
    }

    /// Checks ranges and counts.
    pub fn validate(&self) -> Result<(), BedError> {
        let fail = |code: &str, message: &str| Err(BedError::Config(ErrorInfo::new(code, message)));
        if self.nodes == 0 {
            return fail("empty-graph", "experiments need at least one node");
        }
        if self.methods.is_empty() {
            return fail("no-methods", "list at least one method");
        }
        if self.k_range.is_empty() || self.k_range.contains(&0) {
            return fail("invalid-k-range", "k_range must be non-empty and positive");
        }
        if self.b_range.is_empty() || self.b_range.contains(&0) {
            return fail("invalid-b-range", "b_range must be non-empty and positive");
        }
        if !self.k_range.windows(2).all(|w| w[0] < w[1]) || !self.b_range.windows(2).all(|w| w[0] < w[1]) {
            return fail("unsorted-range", "k_range and b_range must be strictly ascending");
        }
        if self.repeats == 0 || self.objective_samples == 0 || self.max_enumeration == 0 {
            return fail(
                "invalid-count",
                "repeats, objective_samples and max_enumeration must be positive",
            );
        }
        if self.generator.is_dream() && self.dream_dir.is_none() {
            return Err(BedError::Config(
                ErrorInfo::new("missing-dream-dir", "DREAM generators need dream_dir")
                    .with_context("generator", self.generator),
            ));
        }
        Ok(())
    }
}

/// Reads and validates a YAML experiment configuration.
pub fn load_config(path: &Path) -> Result<ExperimentConfig, BedError> {
    let raw = fs::read_to_string(path).map_err(|err| {
        BedError::Io(ErrorInfo::new("config-read", err.to_string()).with_context("path", path.display()))
    })?;
    let config: ExperimentConfig = serde_yaml::from_str(&raw).map_err(|err| {
        BedError::Config(
            ErrorInfo::new("config-parse", err.to_string()).with_context("path", path.display()),
        )
    })?;
    config.validate()?;
    Ok(config)
}
