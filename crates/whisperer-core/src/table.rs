//! Materialised query results.
//!
//! A [`ResultTable`] is the full, in-memory answer to one query: column names
//! with an inferred [`ColumnKind`] each, and rows of SQLite-style [`Value`]s.

use std::fmt;

use crate::Result;

// ─── Values ──────────────────────────────────────────────────────────────────

/// A single cell, mirroring SQLite's storage classes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl Value {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  /// `true` for integer and real cells.
  pub fn is_numeric(&self) -> bool {
    matches!(self, Self::Integer(_) | Self::Real(_))
  }

  /// Numeric reading of the cell, used for plotting. Text that parses as a
  /// number counts; everything else is `None`.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Integer(i) => Some(*i as f64),
      Self::Real(r) => Some(*r),
      Self::Text(t) => t.trim().parse().ok(),
      Self::Null | Self::Blob(_) => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => Ok(()),
      Self::Integer(i) => write!(f, "{i}"),
      // Keep a trailing `.0` so integral reals stay distinguishable.
      Self::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{r:.1}"),
      Self::Real(r) => write!(f, "{r}"),
      Self::Text(t) => f.write_str(t),
      Self::Blob(b) => f.write_str(&String::from_utf8_lossy(b)),
    }
  }
}

// ─── Columns ─────────────────────────────────────────────────────────────────

/// Inferred kind of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
  /// Every non-null value is an integer or a real, and there is at least one.
  Numeric,
  /// Anything else, including all-null columns.
  Categorical,
}

impl ColumnKind {
  pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
    let mut seen = false;
    for value in values {
      if value.is_null() {
        continue;
      }
      if !value.is_numeric() {
        return Self::Categorical;
      }
      seen = true;
    }
    if seen { Self::Numeric } else { Self::Categorical }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
  pub name: String,
  pub kind: ColumnKind,
}

// ─── Table ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
  pub columns: Vec<Column>,
  pub rows:    Vec<Vec<Value>>,
}

impl ResultTable {
  /// Build a table from column names and rows, inferring each column's kind.
  ///
  /// Rows are expected to be as wide as `names`; missing cells read as null.
  pub fn new(names: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
    let columns = names
      .into_iter()
      .enumerate()
      .map(|(i, name)| {
        let kind = ColumnKind::infer(rows.iter().filter_map(|r| r.get(i)));
        Column { name, kind }
      })
      .collect();
    Self { columns, rows }
  }

  pub fn column_count(&self) -> usize { self.columns.len() }

  pub fn row_count(&self) -> usize { self.rows.len() }

  pub fn kinds(&self) -> Vec<ColumnKind> {
    self.columns.iter().map(|c| c.kind).collect()
  }

  pub fn cell(&self, row: usize, col: usize) -> Option<&Value> {
    self.rows.get(row).and_then(|r| r.get(col))
  }

  /// Serialise the table as CSV with a header row and no index column.
  pub fn to_csv(&self) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
    for row in &self.rows {
      writer.write_record(row.iter().map(Value::to_string))?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table() -> ResultTable {
    ResultTable::new(
      vec!["item_id".into(), "total".into(), "note".into()],
      vec![
        vec![Value::Text("A1".into()), Value::Integer(10), Value::Null],
        vec![Value::Text("B2".into()), Value::Real(2.5), Value::Null],
        vec![Value::Text("C3".into()), Value::Null, Value::Null],
      ],
    )
  }

  #[test]
  fn infers_column_kinds() {
    let t = table();
    assert_eq!(
      t.kinds(),
      vec![
        ColumnKind::Categorical,
        ColumnKind::Numeric,
        ColumnKind::Categorical,
      ]
    );
  }

  #[test]
  fn numeric_text_is_still_categorical() {
    let kind = ColumnKind::infer(&[Value::Text("12".into()), Value::Integer(1)]);
    assert_eq!(kind, ColumnKind::Categorical);
  }

  #[test]
  fn csv_export_has_header_and_rows_in_order() {
    let csv = String::from_utf8(table().to_csv().unwrap()).unwrap();
    assert_eq!(csv, "item_id,total,note\nA1,10,\nB2,2.5,\nC3,,\n");
  }

  #[test]
  fn csv_export_quotes_embedded_commas() {
    let t = ResultTable::new(
      vec!["message".into()],
      vec![vec![Value::Text("low stock, hold".into())]],
    );
    let csv = String::from_utf8(t.to_csv().unwrap()).unwrap();
    assert_eq!(csv, "message\n\"low stock, hold\"\n");
  }

  #[test]
  fn real_display_keeps_fraction_marker() {
    assert_eq!(Value::Real(3.0).to_string(), "3.0");
    assert_eq!(Value::Real(0.25).to_string(), "0.25");
    assert_eq!(Value::Null.to_string(), "");
  }

  #[test]
  fn as_f64_parses_numeric_text() {
    assert_eq!(Value::Text(" 4.5 ".into()).as_f64(), Some(4.5));
    assert_eq!(Value::Text("n/a".into()).as_f64(), None);
    assert_eq!(Value::Integer(7).as_f64(), Some(7.0));
  }
}
