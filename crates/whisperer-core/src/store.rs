//! The `DataStore` and `SqlGenerator` traits.
//!
//! Backends implement them (`whisperer-store-sqlite`, `whisperer-llm`); the
//! session pipeline and the UI depend on the abstraction only.

use std::future::Future;

use crate::{relation::TableSchema, table::ResultTable};

/// A queryable relational store.
pub trait DataStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every table in the store with its ordered `(column, declared type)`
  /// pairs. Pure read.
  fn schema(
    &self,
  ) -> impl Future<Output = Result<Vec<TableSchema>, Self::Error>> + Send + '_;

  /// Run `sql` as-is and materialise the complete result set.
  fn execute<'a>(
    &'a self,
    sql: &'a str,
  ) -> impl Future<Output = Result<ResultTable, Self::Error>> + Send + 'a;
}

/// Something that turns a prompt into SQL text.
pub trait SqlGenerator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Send `prompt` and return the complete generated text. Blocks the caller
  /// until generation finishes or fails.
  fn generate<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// Short name for status messages (e.g. the model name).
  fn name(&self) -> &str;
}
