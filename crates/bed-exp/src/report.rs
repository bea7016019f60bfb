use std::fs;
use std::path::{Path, PathBuf};

use bed_core::errors::{BedError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::runner::ExperimentReport;

/// Mean and standard error of one result key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Result key `b=<b>_k=<k>_<method>`.
    pub key: String,
    /// Number of recorded values.
    pub count: usize,
    /// Mean normalised objective value.
    pub mean: f64,
    /// Standard error of the mean (zero for fewer than two values).
    pub std_error: f64,
    /// Mean selection time in seconds, when times were recorded.
    pub mean_time: Option<f64>,
}

/// Paths written by [`write_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    /// Objective values per key.
    pub ovs: PathBuf,
    /// Selection times per key.
    pub times: PathBuf,
    /// Rejected draws per repeat.
    pub invalids: PathBuf,
    /// Full report including provenance.
    pub report: PathBuf,
    /// Per-key summary table.
    pub summary: PathBuf,
}

/// Per-key summary rows, in key order. Keys without values are skipped.
pub fn summarise(report: &ExperimentReport) -> Vec<SummaryRow> {
    report
        .ovs
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(key, values)| {
            let (mean, std_error) = mean_and_std_error(values);
            let mean_time = report
                .times
                .get(key)
                .filter(|times| !times.is_empty())
                .map(|times| mean_and_std_error(times).0);
            SummaryRow {
                key: key.clone(),
                count: values.len(),
                mean,
                std_error,
                mean_time,
            }
        })
        .collect()
}

/// Writes `<name>_OVs.json`, `<name>_times.json`, `<name>_invalids.json`,
/// `<name>_report.json` and `<name>_summary.csv` under `out_dir`.
pub fn write_report(report: &ExperimentReport, out_dir: &Path, name: &str) -> Result<ReportFiles, BedError> {
    fs::create_dir_all(out_dir).map_err(|err| io_error("report-dir", err, out_dir))?;
    let path = |suffix: &str| out_dir.join(format!("{name}_{suffix}"));
    let files = ReportFiles {
        ovs: path("OVs.json"),
        times: path("times.json"),
        invalids: path("invalids.json"),
        report: path("report.json"),
        summary: path("summary.csv"),
    };

    write_json(&files.ovs, &report.ovs)?;
    write_json(&files.times, &report.times)?;
    write_json(&files.invalids, &report.invalid_draws)?;
    write_json(&files.report, report)?;

    let mut writer =
        csv::Writer::from_path(&files.summary).map_err(|err| io_error("summary-write", err, &files.summary))?;
    for row in summarise(report) {
        writer
            .serialize(&row)
            .map_err(|err| io_error("summary-write", err, &files.summary))?;
    }
    writer
        .flush()
        .map_err(|err| io_error("summary-write", err, &files.summary))?;
    Ok(files)
}

/// Reads a report written by [`write_report`].
pub fn read_report(path: &Path) -> Result<ExperimentReport, BedError> {
    let raw = fs::read(path).map_err(|err| io_error("report-read", err, path))?;
    serde_json::from_slice(&raw).map_err(|err| {
        BedError::Serde(ErrorInfo::new("json-decode", err.to_string()).with_context("path", path.display()))
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), BedError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| BedError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    fs::write(path, bytes).map_err(|err| io_error("report-write", err, path))
}

fn io_error(code: &str, err: impl ToString, path: &Path) -> BedError {
    BedError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}

fn mean_and_std_error(values: &[f64]) -> (f64, f64) {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);
    (mean, (variance / count).sqrt())
}
