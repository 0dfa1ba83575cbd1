//! [`SqliteStore`], the SQLite implementation of [`DataStore`].

use std::path::{Path, PathBuf};

use whisperer_core::{
  relation::{ColumnInfo, TableSchema},
  store::DataStore,
  table::{ResultTable, Value},
};

use crate::{
  encode::decode_value,
  load::{CsvTable, LoadedTable, TableSource},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum Location {
  /// Opened afresh for every operation and closed when it finishes.
  File(PathBuf),
  /// A single shared connection; an in-memory database does not survive
  /// being reopened.
  Memory(tokio_rusqlite::Connection),
}

/// The e-commerce store backed by a single SQLite file.
///
/// File-backed stores hold no connection between operations. Cloning is cheap.
#[derive(Clone)]
pub struct SqliteStore {
  location: Location,
}

impl SqliteStore {
  /// A store at `path`. Nothing is opened until the first operation.
  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { location: Location::File(path.into()) }
  }

  /// Open an in-memory store. Used by tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { location: Location::Memory(conn) })
  }

  /// Path of the backing file, if there is one.
  pub fn path(&self) -> Option<&Path> {
    match &self.location {
      Location::File(path) => Some(path),
      Location::Memory(_) => None,
    }
  }

  async fn connect(&self) -> Result<tokio_rusqlite::Connection> {
    match &self.location {
      Location::File(path) => Ok(tokio_rusqlite::Connection::open(path).await?),
      Location::Memory(conn) => Ok(conn.clone()),
    }
  }

  /// Replace each source's table with the contents of its CSV file.
  ///
  /// Every file is parsed before anything is written, so a bad file leaves
  /// the store untouched.
  pub async fn load(&self, sources: &[TableSource]) -> Result<Vec<LoadedTable>> {
    let tables = sources
      .iter()
      .map(CsvTable::read)
      .collect::<Result<Vec<_>>>()?;
    let report: Vec<LoadedTable> = tables.iter().map(CsvTable::summary).collect();

    self
      .connect()
      .await?
      .call(move |conn| {
        for table in &tables {
          table.write(conn)?;
        }
        Ok(())
      })
      .await?;

    for loaded in &report {
      tracing::info!(
        table = %loaded.table,
        rows = loaded.rows,
        columns = loaded.columns,
        "table loaded"
      );
    }
    Ok(report)
  }
}

/// What a single `execute` call got to do inside the connection.
enum Ran {
  Rows(Vec<String>, Vec<Vec<Value>>),
  NoRows,
  Nothing,
  TooMany,
}

// ─── DataStore impl ──────────────────────────────────────────────────────────

impl DataStore for SqliteStore {
  type Error = Error;

  async fn schema(&self) -> Result<Vec<TableSchema>> {
    let tables = self
      .connect()
      .await?
      .call(|conn| {
        let names = conn
          .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?
          .query_map([], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut columns_stmt =
          conn.prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")?;

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
          let columns = columns_stmt
            .query_map(rusqlite::params![name], |row| {
              Ok(ColumnInfo {
                name:          row.get(0)?,
                declared_type: row.get(1)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          tables.push(TableSchema { name, columns });
        }
        Ok(tables)
      })
      .await?;

    Ok(tables)
  }

  async fn execute(&self, sql: &str) -> Result<ResultTable> {
    let sql = sql.to_owned();

    let ran = self
      .connect()
      .await?
      .call(move |conn| {
        // Comments and bare `;` are skipped; exactly one real statement may
        // remain, and nothing runs unless that holds.
        let mut batch = rusqlite::Batch::new(conn, &sql);
        let Some(mut stmt) = batch.next()? else {
          return Ok(Ran::Nothing);
        };
        if !matches!(batch.next(), Ok(None)) {
          return Ok(Ran::TooMany);
        }

        let names: Vec<String> = stmt
          .column_names()
          .into_iter()
          .map(str::to_owned)
          .collect();

        if names.is_empty() {
          stmt.execute([])?;
          return Ok(Ran::NoRows);
        }

        let width = names.len();
        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
          let mut values = Vec::with_capacity(width);
          for i in 0..width {
            values.push(decode_value(row.get_ref(i)?));
          }
          rows.push(values);
        }
        Ok(Ran::Rows(names, rows))
      })
      .await
      .map_err(Error::from_query)?;

    match ran {
      Ran::Rows(names, rows) => {
        tracing::debug!(columns = names.len(), rows = rows.len(), "query executed");
        Ok(ResultTable::new(names, rows))
      }
      Ran::NoRows => Err(Error::NoResultSet),
      Ran::Nothing => Err(Error::EmptyStatement),
      Ran::TooMany => Err(Error::MultipleStatements),
    }
  }

}
