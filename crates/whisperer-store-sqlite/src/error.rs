//! Error type for `whisperer-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A source file could not be read or parsed.
  #[error("failed to read {}: {source}", path.display())]
  Csv {
    path:   PathBuf,
    #[source]
    source: csv::Error,
  },

  /// SQLite rejected or failed a caller-supplied statement.
  #[error("{0}")]
  Query(#[source] rusqlite::Error),

  #[error("statement does not return rows")]
  NoResultSet,

  /// Blank or comment-only SQL.
  #[error("no SQL to run")]
  EmptyStatement,

  /// More than one statement, or trailing text after the first. Nothing ran.
  #[error("You can only execute one statement at a time.")]
  MultipleStatements,
}

impl Error {
  /// Unwrap SQLite's own error from a query failure so its message is shown
  /// as-is.
  pub(crate) fn from_query(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(e) => Self::Query(e),
      other => Self::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
