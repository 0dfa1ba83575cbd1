//! Error types for `whisperer-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// Export was requested for an interaction that holds an error, not a table.
  #[error("Q{0} has no result table to export")]
  NothingToExport(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
