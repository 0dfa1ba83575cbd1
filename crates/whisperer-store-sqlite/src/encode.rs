//! Conversions between CSV text, SQLite values and [`whisperer_core`] cells.

use rusqlite::types::{Value as SqlValue, ValueRef};
use whisperer_core::table::Value;

// ─── Column affinity ──────────────────────────────────────────────────────────

/// Declared type for a loaded column, inferred from its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
  Integer,
  Real,
  Text,
}

impl Affinity {
  pub fn as_sql(self) -> &'static str {
    match self {
      Self::Integer => "INTEGER",
      Self::Real => "REAL",
      Self::Text => "TEXT",
    }
  }

  /// Narrowest affinity every non-empty cell fits. All-empty columns are text.
  pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
    let mut affinity = None;
    for cell in cells {
      if cell.is_empty() {
        continue;
      }
      affinity = Some(match affinity {
        None | Some(Self::Integer) if cell.parse::<i64>().is_ok() => Self::Integer,
        None | Some(Self::Integer) | Some(Self::Real) if parse_finite(cell).is_some() => {
          Self::Real
        }
        _ => return Self::Text,
      });
    }
    affinity.unwrap_or(Self::Text)
  }

  /// Convert one CSV cell. Empty cells become `NULL`.
  pub fn encode(self, cell: &str) -> SqlValue {
    if cell.is_empty() {
      return SqlValue::Null;
    }
    match self {
      Self::Integer => cell
        .parse()
        .map(SqlValue::Integer)
        .unwrap_or_else(|_| SqlValue::Text(cell.to_owned())),
      Self::Real => parse_finite(cell)
        .map(SqlValue::Real)
        .unwrap_or_else(|| SqlValue::Text(cell.to_owned())),
      Self::Text => SqlValue::Text(cell.to_owned()),
    }
  }
}

/// `NaN` and the infinities parse as floats but SQLite cannot keep them.
fn parse_finite(cell: &str) -> Option<f64> {
  cell.parse::<f64>().ok().filter(|f| f.is_finite())
}

// ─── Result cells ─────────────────────────────────────────────────────────────

pub fn decode_value(v: ValueRef<'_>) -> Value {
  match v {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::Integer(i),
    ValueRef::Real(r) => Value::Real(r),
    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => Value::Blob(b.to_vec()),
  }
}

// ─── Identifiers ──────────────────────────────────────────────────────────────

/// Double-quote an identifier for use in DDL.
pub fn quote_ident(name: &str) -> String { format!("\"{}\"", name.replace('"', "\"\"")) }
