//! Right panel: the selected question, its SQL, and the result or error.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use whisperer_core::{session::Interaction, table::ResultTable};

use super::chart;

/// Widest a result column is allowed to get, in cells.
const MAX_COLUMN_WIDTH: usize = 30;

/// Most lines of SQL shown before it is cut off.
const MAX_SQL_LINES: u16 = 8;

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render `interaction` into `area`, with the result grid scrolled to
/// `row_scroll`.
pub fn draw(f: &mut Frame, area: Rect, interaction: &Interaction, row_scroll: usize) {
  let block = Block::default()
    .title(format!(
      " Q{}  {} ",
      interaction.position,
      interaction.asked_at.format("%H:%M:%S")
    ))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let sql_lines = if interaction.sql.is_empty() {
    1
  } else {
    (interaction.sql.lines().count() as u16).clamp(1, MAX_SQL_LINES)
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(2),             // question
      Constraint::Length(sql_lines + 1), // generated SQL
      Constraint::Min(0),                // result
    ])
    .split(inner);

  draw_question(f, rows[0], interaction);
  draw_sql(f, rows[1], interaction);

  match &interaction.outcome {
    Ok(table) => draw_result(f, rows[2], interaction, table, row_scroll),
    Err(message) => draw_error(f, rows[2], message),
  }
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn draw_question(f: &mut Frame, area: Rect, interaction: &Interaction) {
  let line = Line::from(vec![
    Span::styled(
      "You asked: ",
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(interaction.question.clone()),
  ]);
  f.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn draw_sql(f: &mut Frame, area: Rect, interaction: &Interaction) {
  let lines: Vec<Line> = if interaction.sql.is_empty() {
    vec![Line::from(Span::styled(
      "(no SQL generated)",
      Style::default().fg(Color::DarkGray),
    ))]
  } else {
    interaction
      .sql
      .lines()
      .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Yellow))))
      .collect()
  };
  f.render_widget(Paragraph::new(lines), area);
}

fn draw_error(f: &mut Frame, area: Rect, message: &str) {
  let para = Paragraph::new(message.to_string())
    .style(Style::default().fg(Color::Red))
    .wrap(Wrap { trim: false });
  f.render_widget(para, area);
}

fn draw_result(
  f: &mut Frame,
  area: Rect,
  interaction: &Interaction,
  table: &ResultTable,
  row_scroll: usize,
) {
  let Some(kind) = interaction.chart() else {
    draw_table(f, area, table, row_scroll);
    return;
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(area);
  draw_table(f, rows[0], table, row_scroll);
  chart::draw(f, rows[1], kind, table);
}

// ─── Result grid ──────────────────────────────────────────────────────────────

fn draw_table(f: &mut Frame, area: Rect, table: &ResultTable, row_scroll: usize) {
  let total = table.row_count();
  let visible = area.height.saturating_sub(3) as usize;
  let first = row_scroll.min(total.saturating_sub(1));
  let last = (first + visible).min(total);

  let title = if total == 0 {
    " Result (no rows) ".to_string()
  } else {
    format!(" Result  rows {}-{} of {} ", first + 1, last, total)
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let header = Row::new(table.columns.iter().map(|c| {
    Cell::from(c.name.clone()).style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
  }));

  let body: Vec<Row> = table.rows[first.min(total)..last]
    .iter()
    .map(|row| Row::new(row.iter().map(|v| Cell::from(v.to_string()))))
    .collect();

  f.render_widget(
    Table::new(body, column_widths(table, first, last))
      .header(header)
      .column_spacing(2)
      .block(block),
    area,
  );
}

/// Width of each column: the widest of its header and its visible cells,
/// capped at [`MAX_COLUMN_WIDTH`].
fn column_widths(table: &ResultTable, first: usize, last: usize) -> Vec<Constraint> {
  table
    .columns
    .iter()
    .enumerate()
    .map(|(i, column)| {
      let widest = (first..last)
        .filter_map(|r| table.cell(r, i))
        .map(|v| v.to_string().chars().count())
        .chain(std::iter::once(column.name.chars().count()))
        .max()
        .unwrap_or(0);
      Constraint::Length(widest.min(MAX_COLUMN_WIDTH) as u16)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use whisperer_core::table::Value;

  use super::*;

  #[test]
  fn widths_cover_header_and_cap_long_cells() {
    let t = ResultTable::new(
      vec!["item_id".into(), "message".into()],
      vec![
        vec![Value::Integer(1), Value::Text("x".repeat(80))],
        vec![Value::Integer(22), Value::Null],
      ],
    );
    let widths = column_widths(&t, 0, 2);
    assert_eq!(widths, vec![Constraint::Length(7), Constraint::Length(30)]);
  }

  #[test]
  fn widths_only_consider_visible_rows() {
    let t = ResultTable::new(
      vec!["n".into()],
      vec![vec![Value::Integer(123_456)], vec![Value::Integer(1)]],
    );
    assert_eq!(column_widths(&t, 1, 2), vec![Constraint::Length(1)]);
  }
}
