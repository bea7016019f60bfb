use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use bed_core::errors::{BedError, ErrorInfo};
use bed_core::rng::{derive_substream_seed, RngHandle};
use bed_core::{Intervention, RunProvenance};
use bed_graph::{
    barabasi_albert, bipartite_erdos_renyi, canonical_dag_hash, chain_with_root, erdos_renyi,
    fully_connected, k_star_forest, observational_essential_graph, scale_free, uniform_random_tree,
    Dag, Pdag,
};
use bed_mec::{enumerate_dags, mec_size, MecSampler, SamplingMode};
use bed_select::{
    ghassami_greedy, lazy_discrete_random_greedy, lazy_greedy_separating_system,
    mean_oriented_gain, random_chordal_batch, scg_plus_plus, scg_plus_plus_menu,
    stochastic_continuous_greedy, ContinuousParams, DagSource, EdgeOrientObjective,
    StochasticOracle, SystemKind,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ExperimentConfig, GeneratorSpec, Method, SelectionSettings};
use crate::dream::load_dream_dag;
use crate::hash::stable_hash_string;

/// Results of one experiment, keyed `b=<b>_k=<k>_<method>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Experiment name used for output files.
    pub name: String,
    /// Normalised objective values, one per repeat.
    pub ovs: BTreeMap<String, Vec<f64>>,
    /// Selection wall-clock times in seconds, one per repeat.
    pub times: BTreeMap<String, Vec<f64>>,
    /// Rejected ground-truth draws per repeat.
    pub invalid_draws: Vec<usize>,
    /// Seed, configuration hash and ground-truth hashes.
    pub provenance: RunProvenance,
}

/// A ground truth accepted for a repeat.
#[derive(Debug, Clone)]
pub struct GroundTruth {
    /// The true DAG.
    pub dag: Dag,
    /// Its observational essential graph.
    pub cpdag: Pdag,
    /// Edges left undirected by observational data.
    pub max_score: usize,
    /// Draws rejected before this one.
    pub rejected: usize,
}

/// Result key of a method at batch size `b` and budget `k`.
pub fn result_key(b: usize, k: usize, method: Method) -> String {
    format!("b={b}_k={k}_{method}")
}

/// Runs every method of `config` on `config.repeats` ground truths.
///
/// Each repeat and each (method, k, b) cell draws from its own substream of
/// `seed`, so adding a method does not change the others' results.
pub fn run_experiment(config: &ExperimentConfig, seed: u64) -> Result<ExperimentReport, BedError> {
    config.validate()?;
    let mut ovs: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut times: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut invalid_draws = Vec::with_capacity(config.repeats);
    let mut graph_hashes = Vec::with_capacity(config.repeats);
    let b_max = config.b_range.iter().copied().max().unwrap_or(1);
    let settings = config.selection_settings();

    for repeat in 0..config.repeats {
        let repeat_seed = derive_substream_seed(seed, repeat as u64);
        let mut rng = RngHandle::substream(repeat_seed, 0);
        let truth = draw_ground_truth(config, &mut rng)?;
        invalid_draws.push(truth.rejected);
        graph_hashes.push(canonical_dag_hash(&truth.dag));
        let scoring = scoring_dags(config, &truth, &mut rng)?;
        info!(
            experiment = %config.name,
            repeat,
            rejected = truth.rejected,
            undirected = truth.max_score,
            scoring_dags = scoring.len(),
            "ground truth accepted"
        );
        let score = |batch: &[Intervention]| {
            mean_oriented_gain(&truth.cpdag, &scoring, batch) / truth.max_score as f64
        };

        for &k in &config.k_range {
            for &b in &config.b_range {
                for (slot, &method) in config.methods.iter().enumerate() {
                    let key = result_key(b, k, method);
                    ovs.entry(key.clone()).or_default();
                    times.entry(key.clone()).or_default();
                    if method.scores_prefixes() && b != b_max {
                        continue;
                    }
                    let cell = ((k as u64) << 40) | ((b as u64) << 20) | slot as u64;
                    let mut method_rng = RngHandle::substream(repeat_seed, cell + 1);
                    let started = Instant::now();
                    let batch = select_batch(&settings, method, &truth.cpdag, b, k, &mut method_rng)?;
                    let elapsed = started.elapsed().as_secs_f64();
                    debug!(%method, k, b, elapsed, ?batch, "selection finished");
                    if let Some(series) = times.get_mut(&key) {
                        series.push(elapsed);
                    }

                    if method.scores_prefixes() {
                        for &prefix in &config.b_range {
                            let value = score(&batch[..prefix.min(batch.len())]);
                            record_value(&mut ovs, prefix, k, method, value, &config.k_range);
                        }
                    } else {
                        record_value(&mut ovs, b, k, method, score(&batch), &config.k_range);
                    }
                }
            }
        }
    }

    Ok(ExperimentReport {
        name: config.name.clone(),
        ovs,
        times,
        invalid_draws,
        provenance: provenance(config, seed, graph_hashes)?,
    })
}

/// Appends `value` under its key. Methods that keep the best smaller budget
/// report the largest of `value` and the latest values recorded at smaller
/// `k` for the same batch size.
pub fn record_value(
    ovs: &mut BTreeMap<String, Vec<f64>>,
    b: usize,
    k: usize,
    method: Method,
    value: f64,
    k_range: &[usize],
) {
    let mut value = value;
    if method.keeps_best_smaller_budget() {
        for &smaller in k_range.iter().filter(|&&kp| kp < k) {
            if let Some(&previous) = ovs.get(&result_key(b, smaller, method)).and_then(|v| v.last()) {
                if previous > value {
                    value = previous;
                }
            }
        }
    }
    ovs.entry(result_key(b, k, method)).or_default().push(value);
}

/// Draws ground truths until one passes the class-size window and leaves at
/// least one edge undirected.
pub fn draw_ground_truth(config: &ExperimentConfig, rng: &mut RngHandle) -> Result<GroundTruth, BedError> {
    let n = config.nodes;
    let k_max = config.k_range.iter().copied().max().unwrap_or(1);
    let mut rejected = 0usize;
    loop {
        let dag = generate(config.generator, n, k_max, config.dream_dir.as_deref(), rng)?;
        let cpdag = observational_essential_graph(&dag);
        let max_score = dag.num_edges() - cpdag.num_directed();
        let accepted = max_score > 0 && within_window(config, &cpdag)?;
        if accepted {
            return Ok(GroundTruth {
                dag,
                cpdag,
                max_score,
                rejected,
            });
        }
        if config.generator.is_dream() {
            return Err(BedError::Experiment(
                ErrorInfo::new("identified-truth", "gold standard is fully identified observationally")
                    .with_context("generator", config.generator),
            ));
        }
        rejected += 1;
        if rejected >= config.max_draws {
            return Err(BedError::Experiment(
                ErrorInfo::new("no-valid-dag", "no ground truth passed the acceptance window")
                    .with_context("generator", config.generator)
                    .with_context("nodes", n)
                    .with_context("draws", rejected)
                    .with_hint("widen mec_filter or change the generator parameters"),
            ));
        }
    }
}

fn within_window(config: &ExperimentConfig, cpdag: &Pdag) -> Result<bool, BedError> {
    if !config.mec_filter.enabled || !config.generator.filters_by_mec_size() {
        return Ok(true);
    }
    let (lower, upper) = config.mec_filter.bounds(config.nodes);
    match mec_size(cpdag) {
        Ok(size) => Ok(size >= lower as u128 && size <= upper as u128),
        Err(err) if err.code() == "count-overflow" => Ok(false),
        Err(err) => Err(err),
    }
}

/// Draws one graph from `spec`.
pub fn generate(
    spec: GeneratorSpec,
    n: usize,
    k_max: usize,
    dream_dir: Option<&Path>,
    rng: &mut RngHandle,
) -> Result<Dag, BedError> {
    match spec {
        GeneratorSpec::Chain => {
            let root = rng.gen_range(0..n.max(1));
            chain_with_root(n, root)
        }
        GeneratorSpec::Tree => uniform_random_tree(n, rng),
        GeneratorSpec::Bipartite => bipartite_erdos_renyi(n / 2, n - n / 2, 0.5, rng),
        GeneratorSpec::ErdosRenyi { p } => erdos_renyi(n, p, rng),
        GeneratorSpec::FullyConnected => fully_connected(n),
        GeneratorSpec::BarabasiAlbert { m } => barabasi_albert(n, m, rng),
        GeneratorSpec::KStar => k_star_forest(n, k_max, rng),
        GeneratorSpec::ScaleFree { alpha, beta } => scale_free(n, alpha, beta, rng),
        GeneratorSpec::Dream { .. } => {
            let file = spec.dream_file().ok_or_else(|| {
                BedError::Config(
                    ErrorInfo::new("unknown-generator", "DREAM index outside 1..=5")
                        .with_context("generator", spec),
                )
            })?;
            let dir = dream_dir.ok_or_else(|| {
                BedError::Config(ErrorInfo::new("missing-dream-dir", "DREAM generators need dream_dir"))
            })?;
            load_dream_dag(&dir.join(file), n)
        }
    }
}

/// DAGs a batch is scored against: the truth itself for DREAM networks,
/// otherwise [`scoring_members`] of its class.
fn scoring_dags(
    config: &ExperimentConfig,
    truth: &GroundTruth,
    rng: &mut RngHandle,
) -> Result<Vec<Dag>, BedError> {
    if config.generator.is_dream() {
        return Ok(vec![truth.dag.clone()]);
    }
    scoring_members(&truth.cpdag, config.max_enumeration, rng)
}

/// The whole class of `cpdag` when it has at most `max_enumeration` members,
/// otherwise a uniform sample of that many members.
pub fn scoring_members(cpdag: &Pdag, max_enumeration: u64, rng: &mut RngHandle) -> Result<Vec<Dag>, BedError> {
    let limit = max_enumeration as u128;
    let sample_count = usize::try_from(max_enumeration).unwrap_or(usize::MAX);
    match mec_size(cpdag) {
        Ok(size) if size <= limit => enumerate_dags(cpdag, limit),
        Ok(_) => MecSampler::new(cpdag, SamplingMode::Exact).sample_many(sample_count, rng),
        // rooted counts are unavailable; only complete graphs reach this size
        Err(err) if err.code() == "count-overflow" => {
            MecSampler::new(cpdag, SamplingMode::Fast).sample_many(sample_count, rng)
        }
        Err(err) => Err(err),
    }
}

/// Runs `method` on `cpdag` for a batch of `b` interventions of at most `k`
/// nodes each.
pub fn select_batch(
    settings: &SelectionSettings,
    method: Method,
    cpdag: &Pdag,
    b: usize,
    k: usize,
    rng: &mut RngHandle,
) -> Result<Vec<Intervention>, BedError> {
    let n = cpdag.num_nodes();
    let continuous = &settings.continuous;
    let oracle = || {
        StochasticOracle::new(
            DagSource::mec(cpdag, continuous.oracle_samples, continuous.oracle_mode),
            continuous.oracle_masks,
        )
    };
    let menu_params = ContinuousParams {
        iterations: continuous.iterations_per_batch * b,
        ..continuous.params
    };
    let agnostic = SystemKind::Generic { all_budgets: false };

    match method {
        Method::Rand => random_chordal_batch(cpdag, b, k, rng),
        Method::SsA => {
            let objective = sampled_objective(settings, cpdag, rng)?;
            lazy_greedy_separating_system(cpdag, b, k, agnostic, &objective, rng)
        }
        Method::SsB => {
            let objective = sampled_objective(settings, cpdag, rng)?;
            lazy_greedy_separating_system(cpdag, b, k, SystemKind::GraphAware, &objective, rng)
        }
        Method::SsACont => {
            let objective = sampled_objective(settings, cpdag, rng)?;
            scg_plus_plus_menu(cpdag, b, k, agnostic, &objective, &mut oracle(), &menu_params, rng)
        }
        Method::SsBCont => {
            let objective = sampled_objective(settings, cpdag, rng)?;
            scg_plus_plus_menu(
                cpdag,
                b,
                k,
                SystemKind::GraphAware,
                &objective,
                &mut oracle(),
                &menu_params,
                rng,
            )
        }
        Method::Cont => {
            let objective = sampled_objective(settings, cpdag, rng)?;
            scg_plus_plus(n, b, k, &objective, &mut oracle(), &continuous.params, rng)
        }
        Method::Drg => {
            let objective = sampled_objective(settings, cpdag, rng)?;
            lazy_discrete_random_greedy(n, b, k, &objective, rng)
        }
        Method::Greedy => ghassami_greedy(cpdag, b, settings.objective_samples, SamplingMode::Exact, rng),
        Method::Scg => {
            let objective = sampled_objective(settings, cpdag, rng)?;
            stochastic_continuous_greedy(n, b, k, &objective, &mut oracle(), &continuous.params, rng)
        }
    }
}

fn sampled_objective(
    settings: &SelectionSettings,
    cpdag: &Pdag,
    rng: &mut RngHandle,
) -> Result<EdgeOrientObjective, BedError> {
    EdgeOrientObjective::sampled(cpdag, settings.objective_samples, SamplingMode::Exact, rng)
}

fn provenance(
    config: &ExperimentConfig,
    seed: u64,
    graph_hashes: Vec<String>,
) -> Result<RunProvenance, BedError> {
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert("bed-exp".to_string(), env!("CARGO_PKG_VERSION").to_string());
    Ok(RunProvenance {
        schema_version: Default::default(),
        input_hash: stable_hash_string(&(config, seed))?,
        graph_hashes,
        seed,
        created_at: chrono::Utc::now().to_rfc3339(),
        tool_versions,
    })
}
