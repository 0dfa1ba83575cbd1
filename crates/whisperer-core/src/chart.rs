//! Chart selection for two-column results.
//!
//! Everything here is pure: the UI asks [`choose_chart`] what to draw and
//! [`points`] / [`pie_slices`] for the data, then does the drawing itself.

use crate::table::{ColumnKind, ResultTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
  Bar,
  Line,
  Pie,
}

/// Pick a chart for a result with the given column kinds.
///
/// Only two-column results get a chart. A numeric second column wins (bar),
/// then a numeric first column (line), then a categorical first column (pie).
pub fn choose_chart(kinds: &[ColumnKind]) -> Option<ChartKind> {
  match kinds {
    [_, ColumnKind::Numeric] => Some(ChartKind::Bar),
    [ColumnKind::Numeric, _] => Some(ChartKind::Line),
    [ColumnKind::Categorical, _] => Some(ChartKind::Pie),
    _ => None,
  }
}

/// One row of a two-column result, read for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
  /// First column as displayed text.
  pub label: String,
  /// First column as a number, if it reads as one.
  pub x:     Option<f64>,
  /// Second column as a number, if it reads as one.
  pub y:     Option<f64>,
}

/// Read the first two columns of `table` as plot points, in row order.
pub fn points(table: &ResultTable) -> Vec<ChartPoint> {
  table
    .rows
    .iter()
    .map(|row| {
      let first = row.first();
      ChartPoint {
        label: first.map(ToString::to_string).unwrap_or_default(),
        x:     first.and_then(|v| v.as_f64()),
        y:     row.get(1).and_then(|v| v.as_f64()),
      }
    })
    .collect()
}

/// Share of the total per label, for a pie-style breakdown.
///
/// Points without a positive value are left out. Empty when nothing is left.
pub fn pie_slices(points: &[ChartPoint]) -> Vec<(String, f64)> {
  let positive: Vec<(&str, f64)> = points
    .iter()
    .filter_map(|p| p.y.filter(|y| *y > 0.0).map(|y| (p.label.as_str(), y)))
    .collect();
  let total: f64 = positive.iter().map(|(_, y)| y).sum();
  if total <= 0.0 {
    return Vec::new();
  }
  positive
    .into_iter()
    .map(|(label, y)| (label.to_owned(), y / total))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::table::{
    ColumnKind::{Categorical, Numeric},
    Value,
  };

  #[test]
  fn second_column_numeric_is_bar() {
    assert_eq!(choose_chart(&[Categorical, Numeric]), Some(ChartKind::Bar));
  }

  #[test]
  fn bar_wins_when_both_columns_numeric() {
    assert_eq!(choose_chart(&[Numeric, Numeric]), Some(ChartKind::Bar));
  }

  #[test]
  fn only_first_column_numeric_is_line() {
    assert_eq!(choose_chart(&[Numeric, Categorical]), Some(ChartKind::Line));
  }

  #[test]
  fn both_categorical_is_pie() {
    assert_eq!(choose_chart(&[Categorical, Categorical]), Some(ChartKind::Pie));
  }

  #[test]
  fn other_shapes_have_no_chart() {
    assert_eq!(choose_chart(&[]), None);
    assert_eq!(choose_chart(&[Numeric]), None);
    assert_eq!(choose_chart(&[Categorical, Numeric, Numeric]), None);
  }

  #[test]
  fn points_read_first_two_columns() {
    let t = ResultTable::new(
      vec!["month".into(), "sales".into()],
      vec![
        vec![Value::Text("2025-01".into()), Value::Real(10.5)],
        vec![Value::Text("2025-02".into()), Value::Null],
      ],
    );
    let pts = points(&t);
    assert_eq!(pts.len(), 2);
    assert_eq!(pts[0].label, "2025-01");
    assert_eq!(pts[0].x, None);
    assert_eq!(pts[0].y, Some(10.5));
    assert_eq!(pts[1].y, None);
  }

  #[test]
  fn pie_slices_are_shares_of_positive_total() {
    let pts = vec![
      ChartPoint { label: "a".into(), x: None, y: Some(3.0) },
      ChartPoint { label: "b".into(), x: None, y: Some(1.0) },
      ChartPoint { label: "c".into(), x: None, y: None },
      ChartPoint { label: "d".into(), x: None, y: Some(-2.0) },
    ];
    let slices = pie_slices(&pts);
    assert_eq!(slices, vec![("a".to_owned(), 0.75), ("b".to_owned(), 0.25)]);
  }

  #[test]
  fn pie_slices_empty_without_values() {
    let pts = vec![ChartPoint { label: "a".into(), x: None, y: None }];
    assert!(pie_slices(&pts).is_empty());
  }
}
