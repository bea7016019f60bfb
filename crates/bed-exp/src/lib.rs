#![deny(missing_docs)]
//! Experiment orchestration: YAML configurations, ground-truth generation,
//! the selector comparison loop and JSON/CSV reports.

mod config;
mod dream;
mod hash;
mod report;
mod runner;
mod suite;

pub use config::{
    load_config, ContinuousSettings, ExperimentConfig, GeneratorSpec, MecFilter, Method, SelectionSettings,
    DREAM_NETWORKS,
};
pub use dream::load_dream_dag;
pub use hash::stable_hash_string;
pub use report::{read_report, summarise, write_report, ReportFiles, SummaryRow};
pub use runner::{
    draw_ground_truth, generate, record_value, result_key, run_experiment, scoring_members, select_batch,
    ExperimentReport, GroundTruth,
};
pub use suite::{default_suite, run_suite};
