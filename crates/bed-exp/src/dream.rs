use std::path::Path;

use bed_core::errors::{BedError, ErrorInfo};
use bed_graph::Dag;
use tracing::debug;

/// Loads a DREAM signed gold standard (`G<i>\tG<j>\t<sign>` per line, genes
/// numbered from 1) as a DAG on `n` nodes.
///
/// Edges are added in file order; an edge that would close a cycle is
/// skipped, as are duplicates.
pub fn load_dream_dag(path: &Path, n: usize) -> Result<Dag, BedError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|err| dream_error("dream-read", err, path))?;

    let mut dag = Dag::empty(n);
    let mut skipped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|err| dream_error("dream-read", err, path))?;
        if record.len() < 2 {
            continue;
        }
        let from = parse_gene(&record[0], n, line, path)?;
        let to = parse_gene(&record[1], n, line, path)?;
        if from == to || dag.has_edge(from, to) || dag.reaches(to, from) {
            skipped += 1;
            continue;
        }
        dag.insert_edge(from, to)?;
    }
    debug!(path = %path.display(), edges = dag.num_edges(), skipped, "loaded gold standard");
    Ok(dag)
}

fn parse_gene(field: &str, n: usize, line: usize, path: &Path) -> Result<usize, BedError> {
    let index = field
        .trim()
        .strip_prefix('G')
        .and_then(|digits| digits.parse::<usize>().ok())
        .filter(|&index| (1..=n).contains(&index));
    index.map(|index| index - 1).ok_or_else(|| {
        BedError::Graph(
            ErrorInfo::new("dream-gene", "gene label is not G<1..n>")
                .with_context("field", field)
                .with_context("line", line + 1)
                .with_context("nodes", n)
                .with_context("path", path.display()),
        )
    })
}

fn dream_error(code: &str, err: impl ToString, path: &Path) -> BedError {
    BedError::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}
