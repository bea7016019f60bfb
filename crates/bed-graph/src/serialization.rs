use bed_core::errors::{BedError, ErrorInfo};
use bed_core::provenance::SchemaVersion;
use serde::{Deserialize, Serialize};

use crate::dag::Dag;
use crate::pdag::Pdag;

const GRAPH_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializes the DAG to a compact binary representation using `bincode`.
pub fn dag_to_bytes(dag: &Dag) -> Result<Vec<u8>, BedError> {
    bincode::serialize(&SerializableDag::from_dag(dag))
        .map_err(|err| BedError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores a DAG from its binary representation.
pub fn dag_from_bytes(bytes: &[u8]) -> Result<Dag, BedError> {
    let serializable: SerializableDag = bincode::deserialize(bytes)
        .map_err(|err| BedError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    serializable.into_dag()
}

/// Serializes the DAG to a JSON string.
pub fn dag_to_json(dag: &Dag) -> Result<String, BedError> {
    serde_json::to_string_pretty(&SerializableDag::from_dag(dag))
        .map_err(|err| BedError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a DAG from a JSON string. Cyclic edge lists are rejected.
pub fn dag_from_json(json: &str) -> Result<Dag, BedError> {
    let serializable: SerializableDag = serde_json::from_str(json)
        .map_err(|err| BedError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    serializable.into_dag()
}

/// Serializes a partially directed graph to a JSON string.
pub fn pdag_to_json(pdag: &Pdag) -> Result<String, BedError> {
    let serializable = SerializablePdag {
        schema_version: GRAPH_SCHEMA,
        nodes: pdag.num_nodes(),
        directed: pdag.directed_edges(),
        undirected: pdag.undirected_edges(),
    };
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| BedError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a partially directed graph from a JSON string.
pub fn pdag_from_json(json: &str) -> Result<Pdag, BedError> {
    let serializable: SerializablePdag = serde_json::from_str(json)
        .map_err(|err| BedError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))?;
    let n = serializable.nodes;
    let mut pdag = Pdag::empty(n);
    for &(u, v) in &serializable.undirected {
        check_endpoints(n, u, v)?;
        pdag.set_undirected(u, v);
    }
    for &(u, v) in &serializable.directed {
        check_endpoints(n, u, v)?;
        pdag.set_undirected(u, v);
        pdag.orient(u, v);
    }
    Ok(pdag)
}

fn check_endpoints(n: usize, u: usize, v: usize) -> Result<(), BedError> {
    if u >= n || v >= n || u == v {
        return Err(BedError::Serde(
            ErrorInfo::new("invalid-edge", "edge endpoints must be distinct graph nodes")
                .with_context("from", u)
                .with_context("to", v)
                .with_context("nodes", n),
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableDag {
    #[serde(default)]
    schema_version: SchemaVersion,
    nodes: usize,
    edges: Vec<(usize, usize)>,
}

impl SerializableDag {
    fn from_dag(dag: &Dag) -> Self {
        Self {
            schema_version: GRAPH_SCHEMA,
            nodes: dag.num_nodes(),
            edges: dag.edges(),
        }
    }

    fn into_dag(self) -> Result<Dag, BedError> {
        Dag::from_edges(self.nodes, &self.edges)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializablePdag {
    #[serde(default)]
    schema_version: SchemaVersion,
    nodes: usize,
    #[serde(default)]
    directed: Vec<(usize, usize)>,
    #[serde(default)]
    undirected: Vec<(usize, usize)>,
}
