use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the report pipeline.
///
/// Row-level problems (bad dates, non-numeric sales) never appear here; those
/// rows are dropped and counted in the normalization report instead.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot read input file '{}': {source}", path.display())]
    File { path: PathBuf, source: io::Error },
    #[error("input '{}' is missing required column(s): {}", path.display(), missing.join(", "))]
    Schema { path: PathBuf, missing: Vec<String> },
    #[error("malformed CSV header: {0}")]
    Csv(#[from] csv::Error),
    #[error("no valid orders remain after normalization")]
    NoOrders,
    #[error("chart rendering failed: {0}")]
    Chart(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
