//! TUI rendering: header, sidebar, selected interaction, input, status bar.

pub mod chart;
pub mod interaction;
pub mod sidebar;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Mode};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(3), // question input
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0]);
  draw_body(f, rows[1], app);
  draw_input(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " Data Whisperer  ask your e-commerce data in plain English",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::Gray));

  let pad = (area.width as usize)
    .saturating_sub(left.width())
    .saturating_sub(right.width());

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
    .split(area);

  sidebar::draw(f, cols[0], app);

  match app.selected_interaction() {
    Some(interaction) => interaction::draw(f, cols[1], interaction, app.row_scroll),
    None => draw_welcome(f, cols[1], app),
  }
}

fn draw_welcome(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Answer ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let dim = Style::default().fg(Color::DarkGray);
  let text = if app.is_thinking() {
    vec![Line::from(Span::styled(
      format!("{} is writing SQL…", app.model_name),
      Style::default().fg(Color::Yellow),
    ))]
  } else {
    vec![
      Line::from(Span::styled("Ask a question about ad sales, total sales or eligibility.", dim)),
      Line::from(""),
      Line::from(Span::styled("  e.g. What is my total sales?", dim)),
      Line::from(Span::styled("  e.g. Calculate the RoAS (Return on Ad Spend).", dim)),
      Line::from(Span::styled(
        "  e.g. Which product had the highest CPC (Cost Per Click)?",
        dim,
      )),
    ]
  };
  f.render_widget(Paragraph::new(text), inner);
}

// ─── Input ────────────────────────────────────────────────────────────────────

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.mode == Mode::Input && !app.is_thinking();
  let border = if focused { Color::Cyan } else { Color::DarkGray };

  let block = Block::default()
    .title(" Question ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let text = if focused {
    format!("{}_", app.input)
  } else {
    app.input.clone()
  };

  // Keep the cursor end visible on long questions.
  let inner_width = block.inner(area).width as usize;
  let chars = text.chars().count();
  let visible: String = text.chars().skip(chars.saturating_sub(inner_width)).collect();

  f.render_widget(Paragraph::new(visible).block(block), area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, mode_bg, hints) = if app.is_thinking() {
    ("THINKING", Color::Yellow, "waiting for the model")
  } else {
    match app.mode {
      Mode::Input => (
        "INPUT",
        Color::Cyan,
        "Enter ask  ↑↓ history  PgUp/PgDn rows  Esc browse  Ctrl-C quit",
      ),
      Mode::Browse => (
        "BROWSE",
        Color::Green,
        "↑↓/jk select  PgUp/PgDn rows  e export CSV  i ask  q quit",
      ),
    }
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(mode_bg)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray));

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, hint_span]))
      .style(Style::default().bg(Color::Black)),
    area,
  );
}
