//! Charts for two-column results.

use ratatui::{
  Frame,
  layout::{Direction, Rect},
  style::{Color, Style},
  symbols::Marker,
  text::{Line, Span},
  widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};
use whisperer_core::{
  chart::{ChartKind, ChartPoint, pie_slices, points},
  table::ResultTable,
};

const PALETTE: [Color; 6] = [
  Color::Cyan,
  Color::Magenta,
  Color::Yellow,
  Color::Green,
  Color::Blue,
  Color::Red,
];

/// Bars are drawn on a fixed integer scale.
const BAR_SCALE: f64 = 1000.0;

/// Render a `kind` chart of `table`'s first two columns into `area`.
pub fn draw(f: &mut Frame, area: Rect, kind: ChartKind, table: &ResultTable) {
  let x_name = table.columns.first().map_or("", |c| c.name.as_str());
  let y_name = table.columns.get(1).map_or("", |c| c.name.as_str());
  let pts = points(table);

  let (title, label) = match kind {
    ChartKind::Bar => ("Bar", format!("{y_name} by {x_name}")),
    ChartKind::Line => ("Line", format!("{y_name} over {x_name}")),
    ChartKind::Pie => ("Share", format!("{y_name} by {x_name}")),
  };
  let block = Block::default()
    .title(format!(" {title}: {label} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  match kind {
    ChartKind::Bar => draw_bar(f, area, block, &pts),
    ChartKind::Line => draw_line(f, area, block, &pts, x_name, y_name),
    ChartKind::Pie => draw_shares(f, area, block, &pts),
  }
}

// ─── Bar ──────────────────────────────────────────────────────────────────────

fn draw_bar(f: &mut Frame, area: Rect, block: Block<'_>, pts: &[ChartPoint]) {
  let max = pts
    .iter()
    .filter_map(|p| p.y)
    .fold(0.0_f64, |m, y| m.max(y));

  let bars: Vec<Bar> = pts
    .iter()
    .enumerate()
    .map(|(i, p)| {
      let y = p.y.unwrap_or(0.0);
      let value = if max > 0.0 { (y.max(0.0) / max * BAR_SCALE).round() as u64 } else { 0 };
      Bar::default()
        .value(value)
        .label(Line::from(p.label.clone()))
        .text_value(p.y.map(format_number).unwrap_or_default())
        .style(Style::default().fg(PALETTE[i % PALETTE.len()]))
    })
    .collect();

  let chart = BarChart::default()
    .block(block)
    .direction(Direction::Horizontal)
    .bar_width(1)
    .bar_gap(0)
    .max(BAR_SCALE as u64)
    .data(BarGroup::default().bars(&bars));
  f.render_widget(chart, area);
}

// ─── Line ─────────────────────────────────────────────────────────────────────

fn draw_line(
  f: &mut Frame,
  area: Rect,
  block: Block<'_>,
  pts: &[ChartPoint],
  x_name: &str,
  y_name: &str,
) {
  let data = line_data(pts);
  if data.is_empty() {
    draw_note(f, area, block, "Nothing to plot: no numeric pairs.");
    return;
  }

  let (x_min, x_max) = bounds(data.iter().map(|(x, _)| *x));
  let (y_min, y_max) = bounds(data.iter().map(|(_, y)| *y));

  let dataset = Dataset::default()
    .name(y_name.to_string())
    .marker(Marker::Braille)
    .graph_type(GraphType::Line)
    .style(Style::default().fg(Color::Cyan))
    .data(&data);

  let chart = Chart::new(vec![dataset])
    .block(block)
    .x_axis(
      Axis::default()
        .title(x_name.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .bounds([x_min, x_max])
        .labels(vec![format_number(x_min), format_number(x_max)]),
    )
    .y_axis(
      Axis::default()
        .title(y_name.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .bounds([y_min, y_max])
        .labels(vec![format_number(y_min), format_number(y_max)]),
    );
  f.render_widget(chart, area);
}

/// Points where both coordinates read as numbers, sorted by x.
fn line_data(pts: &[ChartPoint]) -> Vec<(f64, f64)> {
  let mut data: Vec<(f64, f64)> = pts.iter().filter_map(|p| Some((p.x?, p.y?))).collect();
  data.sort_by(|a, b| a.0.total_cmp(&b.0));
  data
}

/// Min and max of `values`, widened when they coincide so the axis has extent.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
  let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
    (lo.min(v), hi.max(v))
  });
  if min < max { (min, max) } else { (min - 1.0, max + 1.0) }
}

// ─── Share ────────────────────────────────────────────────────────────────────

fn draw_shares(f: &mut Frame, area: Rect, block: Block<'_>, pts: &[ChartPoint]) {
  let slices = pie_slices(pts);
  if slices.is_empty() {
    draw_note(f, area, block, "Nothing to plot: the second column has no positive numbers.");
    return;
  }

  let inner_width = block.inner(area).width as usize;
  let label_width = slices
    .iter()
    .map(|(l, _)| l.chars().count())
    .max()
    .unwrap_or(0)
    .min(20);
  // label, space, bar, space, "100.0%"
  let bar_room = inner_width.saturating_sub(label_width + 8);

  let lines: Vec<Line> = slices
    .iter()
    .enumerate()
    .map(|(i, (label, share))| {
      let len = (share * bar_room as f64).round() as usize;
      let label: String = label.chars().take(label_width).collect();
      Line::from(vec![
        Span::raw(format!("{label:<label_width$} ")),
        Span::styled("█".repeat(len), Style::default().fg(PALETTE[i % PALETTE.len()])),
        Span::raw(format!(" {:.1}%", share * 100.0)),
      ])
    })
    .collect();

  f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_note(f: &mut Frame, area: Rect, block: Block<'_>, note: &str) {
  f.render_widget(
    Paragraph::new(note.to_string())
      .style(Style::default().fg(Color::DarkGray))
      .block(block),
    area,
  );
}

/// Compact number for labels: integers without a fraction, others to two
/// places.
fn format_number(v: f64) -> String {
  if v.fract() == 0.0 && v.abs() < 1e15 {
    format!("{v:.0}")
  } else {
    format!("{v:.2}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pt(x: Option<f64>, y: Option<f64>) -> ChartPoint {
    ChartPoint { label: String::new(), x, y }
  }

  #[test]
  fn line_data_skips_non_numeric_and_sorts() {
    let data = line_data(&[
      pt(Some(3.0), Some(30.0)),
      pt(None, Some(5.0)),
      pt(Some(1.0), Some(10.0)),
      pt(Some(2.0), None),
    ]);
    assert_eq!(data, vec![(1.0, 10.0), (3.0, 30.0)]);
  }

  #[test]
  fn single_value_bounds_are_widened() {
    assert_eq!(bounds([4.0].into_iter()), (3.0, 5.0));
    assert_eq!(bounds([1.0, 9.0, 4.0].into_iter()), (1.0, 9.0));
  }

  #[test]
  fn numbers_are_formatted_compactly() {
    assert_eq!(format_number(12.0), "12");
    assert_eq!(format_number(0.126), "0.13");
    assert_eq!(format_number(-3.5), "-3.50");
  }
}
