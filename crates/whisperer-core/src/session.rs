//! Per-session question pipeline and transcript.
//!
//! A [`Session`] owns the ordered, append-only transcript of
//! [`Interaction`]s. Each submission walks
//! `Idle → PromptBuilding → ModelStreaming → SqlReady → Executing → Rendered`;
//! a failure while streaming or executing jumps straight to `Rendered` with an
//! error payload. Nothing is retried.

use chrono::{DateTime, Local};

use crate::{
  chart::{ChartKind, choose_chart},
  prompt::build_prompt,
  store::{DataStore, SqlGenerator},
  table::ResultTable,
};

// ─── Stage ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Idle,
  PromptBuilding,
  ModelStreaming,
  SqlReady,
  Executing,
  Rendered,
}

// ─── Interaction ─────────────────────────────────────────────────────────────

/// One question and everything that came of it. Never mutated once recorded.
#[derive(Debug, Clone)]
pub struct Interaction {
  /// 1-based position in the transcript.
  pub position: usize,
  pub question: String,
  /// Generated SQL; empty when generation failed.
  pub sql:      String,
  /// The result grid, or a display-ready error message.
  pub outcome:  Result<ResultTable, String>,
  pub asked_at: DateTime<Local>,
}

impl Interaction {
  pub fn table(&self) -> Option<&ResultTable> { self.outcome.as_ref().ok() }

  pub fn error(&self) -> Option<&str> { self.outcome.as_ref().err().map(String::as_str) }

  pub fn chart(&self) -> Option<ChartKind> {
    self.table().and_then(|t| choose_chart(&t.kinds()))
  }

  /// `query_result_<n>.csv`, fixed by transcript position.
  pub fn export_file_name(&self) -> String {
    format!("query_result_{}.csv", self.position)
  }

  /// CSV bytes of the result table.
  pub fn export_csv(&self) -> crate::Result<Vec<u8>> {
    match self.table() {
      Some(table) => table.to_csv(),
      None => Err(crate::Error::NothingToExport(self.position)),
    }
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Session-scoped state: the transcript plus the last submitted question.
#[derive(Debug)]
pub struct Session {
  transcript:    Vec<Interaction>,
  last_question: Option<String>,
  stage:         Stage,
}

impl Default for Session {
  fn default() -> Self { Self::new() }
}

impl Session {
  pub fn new() -> Self {
    Self {
      transcript:    Vec::new(),
      last_question: None,
      stage:         Stage::Idle,
    }
  }

  pub fn transcript(&self) -> &[Interaction] { &self.transcript }

  pub fn stage(&self) -> Stage { self.stage }

  /// Whether submitting `question` would do anything: it must be non-blank
  /// and differ from the immediately previous submission.
  pub fn accepts(&self, question: &str) -> bool {
    !question.trim().is_empty() && self.last_question.as_deref() != Some(question)
  }

  /// Run `question` through generation and execution and append the result
  /// to the transcript.
  ///
  /// Returns `None` without doing anything when [`Session::accepts`] is
  /// false. When generation fails the error is recorded and execution is
  /// skipped.
  pub async fn submit<G, S>(
    &mut self,
    question: &str,
    generator: &G,
    store: &S,
  ) -> Option<&Interaction>
  where
    G: SqlGenerator,
    S: DataStore,
  {
    if !self.accepts(question) {
      tracing::debug!(question, "ignoring blank or repeated question");
      return None;
    }

    let asked_at = Local::now();
    tracing::info!(question, model = generator.name(), "submitting question");

    self.set_stage(Stage::PromptBuilding);
    let prompt = build_prompt(question);

    self.set_stage(Stage::ModelStreaming);
    let (sql, outcome) = match generator.generate(&prompt).await {
      Ok(sql) => {
        self.set_stage(Stage::SqlReady);
        tracing::debug!(%sql, "generated SQL");

        self.set_stage(Stage::Executing);
        let outcome = store
          .execute(&sql)
          .await
          .map_err(|e| format!("SQL Error: {e}"));
        (sql, outcome)
      }
      Err(e) => (String::new(), Err(e.to_string())),
    };

    if let Err(message) = &outcome {
      tracing::warn!(question, %message, "interaction failed");
    }

    self.set_stage(Stage::Rendered);
    self.transcript.push(Interaction {
      position: self.transcript.len() + 1,
      question: question.to_owned(),
      sql,
      outcome,
      asked_at,
    });
    self.last_question = Some(question.to_owned());
    self.transcript.last()
  }

  fn set_stage(&mut self, stage: Stage) {
    tracing::debug!(from = ?self.stage, to = ?stage, "stage transition");
    self.stage = stage;
  }
}
