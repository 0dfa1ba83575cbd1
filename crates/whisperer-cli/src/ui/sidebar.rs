//! Left panel: database schema on top, transcript index below.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, Mode};

/// Render the sidebar into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
    .split(area);

  draw_schema(f, rows[0], app);
  draw_history(f, rows[1], app);
}

fn draw_schema(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Database Schema ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut lines: Vec<Line> = Vec::new();
  for table in &app.schema {
    lines.push(Line::from(Span::styled(
      table.name.clone(),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )));
    let last = table.columns.len().saturating_sub(1);
    for (i, column) in table.columns.iter().enumerate() {
      let branch = if i == last { "└── " } else { "├── " };
      lines.push(Line::from(vec![
        Span::styled(branch, Style::default().fg(Color::DarkGray)),
        Span::raw(column.name.clone()),
        Span::styled(
          format!(" : {}", column.declared_type),
          Style::default().fg(Color::DarkGray),
        ),
      ]));
    }
  }

  if lines.is_empty() {
    lines.push(Line::from(Span::styled(
      "No tables loaded.",
      Style::default().fg(Color::DarkGray),
    )));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
  let transcript = app.session.transcript();

  let block = Block::default()
    .title(format!(" History ({}) ", transcript.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if app.mode == Mode::Browse {
      Color::Cyan
    } else {
      Color::DarkGray
    }));

  let items: Vec<ListItem> = transcript
    .iter()
    .map(|i| {
      let marker = if i.error().is_some() {
        Span::styled("✗ ", Style::default().fg(Color::Red))
      } else {
        Span::styled("✓ ", Style::default().fg(Color::Green))
      };
      ListItem::new(Line::from(vec![
        marker,
        Span::styled(format!("Q{}: ", i.position), Style::default().fg(Color::DarkGray)),
        Span::raw(i.question.clone()),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(app.selected);

  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    area,
    &mut state,
  );
}
