//! Application state and key dispatcher.

use std::{fs, path::PathBuf};

use anyhow::Context as _;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use whisperer_core::{
  relation::TableSchema,
  session::{Interaction, Session},
  store::{DataStore, SqlGenerator},
};

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Typing a question into the footer input.
  Input,
  /// Moving through the transcript, scrolling results, exporting.
  Browse,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state. The generator and store are passed in where
/// needed rather than owned, so the same state drives tests with fakes.
pub struct App {
  pub mode: Mode,

  /// Current contents of the question input.
  pub input: String,

  /// Transcript and pipeline state for this run.
  pub session: Session,

  /// Tables shown in the sidebar, read once at startup.
  pub schema: Vec<TableSchema>,

  /// Index into the transcript of the interaction shown on the right.
  pub selected: Option<usize>,

  /// First visible row of the selected result grid.
  pub row_scroll: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Model name, for status messages.
  pub model_name: String,

  /// A question accepted from the input, waiting for the next frame to be
  /// drawn before it runs.
  pending: Option<String>,

  export_dir: PathBuf,
}

impl App {
  pub fn new(model_name: impl Into<String>, export_dir: impl Into<PathBuf>) -> Self {
    Self {
      mode: Mode::Input,
      input: String::new(),
      session: Session::new(),
      schema: Vec::new(),
      selected: None,
      row_scroll: 0,
      status_msg: String::new(),
      model_name: model_name.into(),
      pending: None,
      export_dir: export_dir.into(),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Read the store's schema for the sidebar.
  pub async fn load_schema<S: DataStore>(&mut self, store: &S) -> anyhow::Result<()> {
    match store.schema().await {
      Ok(schema) => {
        self.schema = schema;
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e).context("reading database schema")
      }
    }
  }

  // ── Transcript ────────────────────────────────────────────────────────────

  pub fn selected_interaction(&self) -> Option<&Interaction> {
    self.selected.and_then(|i| self.session.transcript().get(i))
  }

  pub fn is_thinking(&self) -> bool { self.pending.is_some() }

  /// Run the queued question, if any, and show its result.
  pub async fn run_pending<G, S>(&mut self, generator: &G, store: &S)
  where
    G: SqlGenerator,
    S: DataStore,
  {
    let Some(question) = self.pending.take() else {
      return;
    };

    let summary = self
      .session
      .submit(&question, generator, store)
      .await
      .map(|i| match &i.outcome {
        Ok(table) => format!("Q{}: {} row(s)", i.position, table.row_count()),
        Err(_) => format!("Q{} failed", i.position),
      });

    if let Some(summary) = summary {
      self.select(self.session.transcript().len() - 1);
      self.status_msg = summary;
    }
  }

  fn select(&mut self, index: usize) {
    if self.selected != Some(index) {
      self.row_scroll = 0;
    }
    self.selected = Some(index);
  }

  fn select_next(&mut self) {
    let len = self.session.transcript().len();
    match self.selected {
      Some(i) if i + 1 < len => self.select(i + 1),
      None if len > 0 => self.select(0),
      _ => {}
    }
  }

  fn select_prev(&mut self) {
    if let Some(i) = self.selected
      && i > 0
    {
      self.select(i - 1);
    }
  }

  fn scroll_rows(&mut self, delta: isize) {
    let rows = self
      .selected_interaction()
      .and_then(Interaction::table)
      .map_or(0, |t| t.row_count());
    let max = rows.saturating_sub(1);
    self.row_scroll = self.row_scroll.saturating_add_signed(delta).min(max);
  }

  // ── Export ────────────────────────────────────────────────────────────────

  /// Write the selected result to `<export_dir>/query_result_<n>.csv`.
  pub fn export_selected(&mut self) -> anyhow::Result<PathBuf> {
    let interaction = self
      .selected_interaction()
      .context("nothing selected")?;
    let csv = interaction.export_csv()?;
    let path = self.export_dir.join(interaction.export_file_name());

    fs::create_dir_all(&self.export_dir)
      .with_context(|| format!("creating {}", self.export_dir.display()))?;
    fs::write(&path, csv).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported result");
    Ok(path)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // Keys are ignored while a question is in flight.
    if self.is_thinking() {
      return Ok(true);
    }

    match self.mode {
      Mode::Input => self.handle_input_key(key),
      Mode::Browse => self.handle_browse_key(key),
    }
  }

  fn handle_input_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Enter => self.queue_question(),
      KeyCode::Esc => {
        self.mode = Mode::Browse;
        self.status_msg.clear();
      }
      KeyCode::Backspace => {
        self.input.pop();
      }
      KeyCode::Up => self.select_prev(),
      KeyCode::Down => self.select_next(),
      KeyCode::PageDown => self.scroll_rows(10),
      KeyCode::PageUp => self.scroll_rows(-10),
      KeyCode::Char(c) => self.input.push(c),
      _ => {}
    }
    Ok(true)
  }

  fn handle_browse_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Back to the input
      KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => {
        self.mode = Mode::Input;
        self.status_msg.clear();
      }

      // Transcript navigation
      KeyCode::Down | KeyCode::Char('j') => self.select_next(),
      KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
      KeyCode::Home | KeyCode::Char('g') => {
        if !self.session.transcript().is_empty() {
          self.select(0);
        }
      }
      KeyCode::End | KeyCode::Char('G') => {
        let len = self.session.transcript().len();
        if len > 0 {
          self.select(len - 1);
        }
      }

      // Result grid
      KeyCode::PageDown | KeyCode::Char('J') => self.scroll_rows(10),
      KeyCode::PageUp | KeyCode::Char('K') => self.scroll_rows(-10),

      // Export
      KeyCode::Char('e') => {
        self.status_msg = match self.export_selected() {
          Ok(path) => format!("Saved {}", path.display()),
          Err(e) => format!("Export failed: {e:#}"),
        };
      }

      _ => {}
    }
    Ok(true)
  }

  /// Move the input into the pending slot if the session would accept it.
  fn queue_question(&mut self) {
    if self.input.trim().is_empty() {
      return;
    }
    if !self.session.accepts(&self.input) {
      let last = self.session.transcript().len();
      self.status_msg = format!("Same as the previous question, see Q{last}");
      self.select(last - 1);
      self.input.clear();
      return;
    }
    self.pending = Some(std::mem::take(&mut self.input));
    self.status_msg = format!("{} is thinking…", self.model_name);
  }
}
