//! Newline-delimited JSON stream decoding.

use serde::Deserialize;

use crate::{Error, Result};

/// One line of the streamed reply. Only `response` matters; `error` is what
/// the endpoint sends instead when generation fails mid-stream.
#[derive(Debug, Deserialize)]
struct Chunk {
  #[serde(default)]
  response: String,
  #[serde(default)]
  error:    Option<String>,
}

/// Accumulates text fragments from a chunked reply, in arrival order.
///
/// Bytes may be split anywhere; a trailing partial line is held back until
/// the next push or [`FragmentCollector::finish`]. The first bad line fails
/// the whole collection.
#[derive(Debug, Default)]
pub struct FragmentCollector {
  pending:   Vec<u8>,
  text:      String,
  fragments: usize,
}

impl FragmentCollector {
  pub fn new() -> Self { Self::default() }

  /// Feed raw bytes from the body.
  pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<()> {
    self.pending.extend_from_slice(bytes);
    while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
      let line: Vec<u8> = self.pending.drain(..=pos).collect();
      self.push_line(std::str::from_utf8(&line)?)?;
    }
    Ok(())
  }

  /// Feed one complete line. Blank lines are skipped and an optional `data:`
  /// framing prefix is stripped.
  pub fn push_line(&mut self, line: &str) -> Result<()> {
    let line = line.trim();
    if line.is_empty() {
      return Ok(());
    }
    let payload = line.strip_prefix("data:").map(str::trim_start).unwrap_or(line);

    let chunk: Chunk = serde_json::from_str(payload)?;
    if let Some(message) = chunk.error {
      return Err(Error::Model(message));
    }
    self.text.push_str(&chunk.response);
    self.fragments += 1;
    Ok(())
  }

  /// Number of chunks accepted so far.
  pub fn fragments(&self) -> usize { self.fragments }

  /// Flush any held-back partial line and return the concatenated text.
  pub fn finish(mut self) -> Result<String> {
    let rest = std::mem::take(&mut self.pending);
    self.push_line(std::str::from_utf8(&rest)?)?;
    Ok(self.text)
  }
}
