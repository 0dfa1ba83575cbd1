//! Client for a locally hosted text-generation endpoint.
//!
//! Sends a prompt with `stream: true` and stitches the newline-delimited JSON
//! chunks of the reply back into one string.

mod client;
mod stream;

pub mod error;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, ModelClient, ModelConfig, normalize_sql};
pub use error::{Error, Result};
pub use stream::FragmentCollector;
