use std::fs;
use std::path::Path;

use bed_core::errors::{BedError, ErrorInfo};
use bed_core::rng::derive_substream_seed;
use rayon::prelude::*;
use tracing::info;

use crate::config::{ExperimentConfig, GeneratorSpec, Method};
use crate::report::{write_report, ReportFiles};
use crate::runner::run_experiment;

const SUITE_METHODS: [Method; 7] = [
    Method::Rand,
    Method::SsA,
    Method::SsB,
    Method::SsACont,
    Method::SsBCont,
    Method::Cont,
    Method::Drg,
];

const DREAM_METHODS: [Method; 4] = [Method::Rand, Method::SsA, Method::SsB, Method::Cont];

/// The standing comparison: trees, star forests and Erdos-Renyi graphs on
/// 10, 20 and 40 nodes, plus one DREAM network chosen by `run`.
///
/// Star forests and dense Erdos-Renyi graphs are only run up to 20 nodes.
/// The DREAM entry is skipped when `dream_dir` is `None`.
pub fn default_suite(run: u64, dream_dir: Option<&Path>) -> Vec<ExperimentConfig> {
    let families: [(&str, GeneratorSpec, bool); 5] = [
        ("tree", GeneratorSpec::Tree, false),
        ("kstar", GeneratorSpec::KStar, true),
        ("ER_0.5", GeneratorSpec::ErdosRenyi { p: 0.5 }, true),
        ("ER_0.25", GeneratorSpec::ErdosRenyi { p: 0.25 }, false),
        ("ER_0.1", GeneratorSpec::ErdosRenyi { p: 0.1 }, false),
    ];

    let mut configs = Vec::new();
    for nodes in [10usize, 20, 40] {
        for (label, generator, small_only) in families {
            if small_only && nodes > 20 {
                continue;
            }
            let k_range = if nodes <= 20 { vec![1, 2, 3] } else { vec![1, 2, 3, 4, 5] };
            let mut config = ExperimentConfig::new(nodes, generator, SUITE_METHODS.to_vec(), k_range);
            config.name = format!("{label}_n={nodes}_{run}");
            config.repeats = match generator {
                GeneratorSpec::ErdosRenyi { .. } => 2,
                _ => 1,
            };
            configs.push(config);
        }
    }

    if let Some(dir) = dream_dir {
        let index = (run % 5) as usize + 1;
        let mut config = ExperimentConfig::new(
            50,
            GeneratorSpec::Dream { index },
            DREAM_METHODS.to_vec(),
            vec![1, 2, 3, 4, 5],
        );
        config.name = format!("dream_{index}_n=50_{run}");
        config.repeats = 1;
        config.dream_dir = Some(dir.to_path_buf());
        configs.push(config);
    }
    configs
}

/// Runs `configs` on up to `concurrency` threads and writes each report under
/// `out`. Experiment `i` uses seed `derive_substream_seed(seed, i)`.
pub fn run_suite(
    configs: &[ExperimentConfig],
    out: &Path,
    seed: u64,
    concurrency: usize,
) -> Result<Vec<ReportFiles>, BedError> {
    fs::create_dir_all(out).map_err(|err| suite_error("suite-out-dir", err, out))?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .build()
        .map_err(|err| BedError::Experiment(ErrorInfo::new("thread-pool", err.to_string())))?;

    let results: Result<Vec<_>, BedError> = pool.install(|| {
        configs
            .par_iter()
            .enumerate()
            .map(|(index, config)| -> Result<(usize, ReportFiles), BedError> {
                let report = run_experiment(config, derive_substream_seed(seed, index as u64))?;
                let files = write_report(&report, out, &config.name)?;
                info!(experiment = %config.name, summary = %files.summary.display(), "experiment written");
                Ok((index, files))
            })
            .collect()
    });

    let mut ordered = results?;
    ordered.sort_by_key(|(index, _)| *index);
    Ok(ordered.into_iter().map(|(_, files)| files).collect())
}

fn suite_error(code: &str, err: impl ToString, path: &Path) -> BedError {
    BedError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}
