//! `whisperer`: ask questions about the e-commerce dataset in plain English.
//!
//! # Usage
//!
//! ```
//! whisperer                         # load the CSVs, then open the TUI
//! whisperer --model llama3 --db /tmp/shop.db
//! whisperer load --sample 5         # load only, print a few rows
//! ```

mod app;
mod settings;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use whisperer_core::{relation::AD_SALES, store::DataStore};
use whisperer_llm::ModelClient;
use whisperer_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "whisperer", version, about = "Natural-language questions over the e-commerce dataset")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "whisperer.toml")]
  config: PathBuf,

  /// SQLite database file to create.
  #[arg(long, value_name = "FILE")]
  db: Option<PathBuf>,

  /// Base URL of the local model server.
  #[arg(long)]
  model_url: Option<String>,

  /// Model to ask for SQL.
  #[arg(long)]
  model: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Load the CSV files into the database and exit.
  Load {
    /// Print the first N rows of ad_sales after loading.
    #[arg(long, value_name = "N")]
    sample: Option<usize>,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // Flags override the environment, which overrides the file.
  let mut settings = Settings::load(&cli.config)?;
  if let Some(db) = cli.db {
    settings.database_path = db;
  }
  if let Some(url) = cli.model_url {
    settings.model_url = url;
  }
  if let Some(model) = cli.model {
    settings.model_name = model;
  }

  match cli.command {
    Some(Command::Load { sample }) => {
      init_tracing_stderr();
      run_load(&settings, sample).await
    }
    None => {
      init_tracing_file(&settings.log_file())?;
      run_tui(&settings).await
    }
  }
}

// ─── Logging ──────────────────────────────────────────────────────────────────

fn env_filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy()
}

fn init_tracing_stderr() {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_writer(io::stderr)
    .init();
}

/// The TUI owns the terminal, so logs go to a file instead.
fn init_tracing_file(path: &Path) -> Result<()> {
  let file = File::options()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(env_filter())
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Loading ──────────────────────────────────────────────────────────────────

/// Build the database from the three CSV files. Any failure is fatal.
async fn load_store(settings: &Settings) -> Result<SqliteStore> {
  let db = settings.database_path();
  let store = SqliteStore::at(&db);
  store
    .load(&settings.sources())
    .await
    .with_context(|| format!("loading CSV files into {}", db.display()))?;
  Ok(store)
}

async fn run_load(settings: &Settings, sample: Option<usize>) -> Result<()> {
  let store = load_store(settings).await?;
  println!("All tables loaded into {}", settings.database_path().display());

  for table in store.schema().await.context("reading schema")? {
    println!("  {} ({} columns)", table.name, table.columns.len());
  }

  if let Some(n) = sample {
    let rows = store
      .execute(&format!("SELECT * FROM {} LIMIT {n}", AD_SALES.name))
      .await
      .context("sampling ad_sales")?;
    println!();
    println!("{}", rows.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join("\t"));
    for row in &rows.rows {
      println!("{}", row.iter().map(ToString::to_string).collect::<Vec<_>>().join("\t"));
    }
  }
  Ok(())
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(settings: &Settings) -> Result<()> {
  let store = load_store(settings).await?;
  let client = ModelClient::new(settings.model_config()).context("building model client")?;
  tracing::info!(
    db = %settings.database_path().display(),
    url = %client.config().base_url,
    model = %client.config().model,
    "starting"
  );

  let mut app = App::new(client.config().model.clone(), settings.export_dir());
  app.load_schema(&store).await?;

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app, &client, &store).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  client: &ModelClient,
  store: &SqliteStore,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // The "thinking" frame is on screen; now block on the pipeline.
    if app.is_thinking() {
      app.run_pending(client, store).await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key)?
    {
      break;
    }
  }

  Ok(())
}
