// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the HVU export utilities.
#[derive(Error, Debug)]
pub enum HvuError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("input has no usable row: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("{count} line(s) with incorrect column count, output not written")]
    ColumnCountMismatch { count: usize },

    #[error("process interrupted by user at line {line}")]
    Interrupted { line: usize },

    #[error("error writing delimited output: {0}")]
    Csv(#[from] csv::Error),

    #[error("error parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("error writing XML output: {0}")]
    Xml(String),

    #[error("error writing report: {0}")]
    Report(#[source] std::io::Error),

    #[error("View '{0}' not found.")]
    ViewNotFound(String),

    #[error("Field '{field}' in view '{view}' not found.")]
    FieldNotFound { view: String, field: String },
}

impl HvuError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HvuError>;
