//! Error type for `whisperer-llm`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  ClientInit(#[source] reqwest::Error),

  #[error("model request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("model endpoint returned {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  /// A streamed chunk was not valid JSON. The whole call fails.
  #[error("Error parsing response: {0}")]
  MalformedChunk(#[from] serde_json::Error),

  #[error("Error parsing response: {0}")]
  Utf8(#[from] std::str::Utf8Error),

  /// The endpoint reported an error inside the stream.
  #[error("model error: {0}")]
  Model(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
