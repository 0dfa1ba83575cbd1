//! CSV → table loading.
//!
//! Each source file is parsed completely in memory first, then written in one
//! transaction that drops and recreates its table. Row order and column order
//! follow the file.

use std::path::{Path, PathBuf};

use rusqlite::types::Value as SqlValue;
use whisperer_core::relation::RELATIONS;

use crate::{
  encode::{Affinity, quote_ident},
  Error, Result,
};

/// One CSV file and the table it populates.
#[derive(Debug, Clone)]
pub struct TableSource {
  pub table: String,
  pub path:  PathBuf,
}

impl TableSource {
  pub fn new(table: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self { table: table.into(), path: path.into() }
  }
}

/// What a load wrote for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
  pub table:   String,
  pub columns: usize,
  pub rows:    usize,
}

/// A parsed source file, ready to write.
#[derive(Debug)]
pub(crate) struct CsvTable {
  pub table:      String,
  pub headers:    Vec<String>,
  pub affinities: Vec<Affinity>,
  pub rows:       Vec<Vec<SqlValue>>,
}

impl CsvTable {
  /// Read and parse `source`. Any read or parse failure is returned as
  /// [`Error::Csv`].
  pub fn read(source: &TableSource) -> Result<Self> {
    let csv_err = |source_err: csv::Error| Error::Csv {
      path:   source.path.clone(),
      source: source_err,
    };

    let mut reader = csv::ReaderBuilder::new()
      .has_headers(true)
      .from_path(&source.path)
      .map_err(csv_err)?;

    let headers: Vec<String> = reader
      .headers()
      .map_err(csv_err)?
      .iter()
      .map(str::to_owned)
      .collect();

    let records = reader
      .records()
      .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()
      .map_err(csv_err)?;

    let affinities: Vec<Affinity> = (0..headers.len())
      .map(|i| Affinity::infer(records.iter().map(|r| r.get(i).unwrap_or_default())))
      .collect();

    let rows = records
      .iter()
      .map(|record| {
        affinities
          .iter()
          .enumerate()
          .map(|(i, a)| a.encode(record.get(i).unwrap_or_default()))
          .collect()
      })
      .collect();

    warn_on_unexpected_header(&source.table, &source.path, &headers);

    Ok(Self {
      table: source.table.clone(),
      headers,
      affinities,
      rows,
    })
  }

  /// Replace the table with this file's contents inside one transaction.
  pub fn write(&self, conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
    let table = quote_ident(&self.table);
    let column_defs = self
      .headers
      .iter()
      .zip(&self.affinities)
      .map(|(name, a)| format!("{} {}", quote_ident(name), a.as_sql()))
      .collect::<Vec<_>>()
      .join(", ");
    let placeholders = (1..=self.headers.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
      "DROP TABLE IF EXISTS {table};
       CREATE TABLE {table} ({column_defs});"
    ))?;
    {
      let mut insert = tx.prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))?;
      for row in &self.rows {
        insert.execute(rusqlite::params_from_iter(row))?;
      }
    }
    tx.commit()
  }

  pub fn summary(&self) -> LoadedTable {
    LoadedTable {
      table:   self.table.clone(),
      columns: self.headers.len(),
      rows:    self.rows.len(),
    }
  }
}

/// Log, without failing, when a known relation's header is not the expected one.
fn warn_on_unexpected_header(table: &str, path: &Path, headers: &[String]) {
  let Some(expected) = RELATIONS.iter().find(|r| r.name == table) else {
    return;
  };
  if headers.iter().map(String::as_str).ne(expected.columns.iter().copied()) {
    tracing::warn!(
      table,
      path = %path.display(),
      ?headers,
      expected = ?expected.columns,
      "source header differs from the expected columns"
    );
  }
}
