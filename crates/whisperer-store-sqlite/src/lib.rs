//! SQLite backend for Data Whisperer.
//!
//! Loads the source CSV files into tables, reports the schema back and runs
//! generated SQL. All database access goes through [`tokio_rusqlite`] so it
//! never blocks the async runtime.

mod encode;
mod load;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use load::{LoadedTable, TableSource};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
