//! Streaming HTTP client for the local generation endpoint.

use std::time::Duration;

use futures_util::StreamExt as _;
use reqwest::Client;
use serde::Serialize;
use whisperer_core::store::SqlGenerator;

use crate::{Error, FragmentCollector, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "mistral";

/// Where the model lives and which one to ask.
#[derive(Debug, Clone)]
pub struct ModelConfig {
  pub base_url: String,
  pub model:    String,
}

impl Default for ModelConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_owned(),
      model:    DEFAULT_MODEL.to_owned(),
    }
  }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
  model:  &'a str,
  prompt: &'a str,
  stream: bool,
}

/// Client for `POST /api/generate` with a streamed reply.
///
/// There is no overall request timeout: generation runs until
/// the stream ends. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ModelClient {
  client: Client,
  config: ModelConfig,
}

impl ModelClient {
  pub fn new(config: ModelConfig) -> Result<Self> {
    let client = Client::builder()
      .connect_timeout(Duration::from_secs(10))
      .build()
      .map_err(Error::ClientInit)?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &ModelConfig { &self.config }

  fn url(&self) -> String {
    format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
  }

  /// Send `prompt` and return the concatenated fragments exactly as streamed.
  pub async fn generate_raw(&self, prompt: &str) -> Result<String> {
    let body = GenerateRequest {
      model: &self.config.model,
      prompt,
      stream: true,
    };

    let resp = self.client.post(self.url()).json(&body).send().await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status, body });
    }

    let mut collector = FragmentCollector::new();
    let mut stream = resp.bytes_stream();
    while let Some(bytes) = stream.next().await {
      collector.push_bytes(&bytes?)?;
    }
    tracing::debug!(
      model = %self.config.model,
      fragments = collector.fragments(),
      "generation stream finished"
    );
    collector.finish()
  }
}

impl SqlGenerator for ModelClient {
  type Error = Error;

  async fn generate(&self, prompt: &str) -> Result<String> {
    let raw = self.generate_raw(prompt).await?;
    Ok(normalize_sql(&raw))
  }

  fn name(&self) -> &str { &self.config.model }
}

/// Trim generated text and drop a surrounding Markdown code fence, with or
/// without a language tag.
pub fn normalize_sql(raw: &str) -> String {
  let trimmed = raw.trim();
  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed.to_owned();
  };
  let rest = match rest.split_once('\n') {
    Some((tag, body)) if is_fence_tag(tag.trim()) => body,
    _ => rest,
  };
  rest.trim_end().strip_suffix("```").unwrap_or(rest).trim().to_owned()
}

/// Language tags a model puts on the opening fence line.
fn is_fence_tag(tag: &str) -> bool {
  tag.is_empty() || tag.eq_ignore_ascii_case("sql") || tag.eq_ignore_ascii_case("sqlite")
}
