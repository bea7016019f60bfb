//! Structured error types shared across the workspace.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`BedError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (node ids, sizes, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum BedError {
    /// Graph construction and orientation errors.
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Markov equivalence class counting and sampling errors.
    #[error("mec error: {0}")]
    Mec(ErrorInfo),
    /// Intervention selection errors.
    #[error("selection error: {0}")]
    Selection(ErrorInfo),
    /// Experiment orchestration errors.
    #[error("experiment error: {0}")]
    Experiment(ErrorInfo),
    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Randomness and seeding errors.
    #[error("rng error: {0}")]
    Rng(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl BedError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            BedError::Graph(info)
            | BedError::Mec(info)
            | BedError::Selection(info)
            | BedError::Experiment(info)
            | BedError::Config(info)
            | BedError::Rng(info)
            | BedError::Serde(info)
            | BedError::Io(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}

impl From<std::io::Error> for BedError {
    fn from(err: std::io::Error) -> Self {
        BedError::Io(ErrorInfo::new("io", err.to_string()))
    }
}
