//! Core types and trait definitions for Data Whisperer.
//!
//! This crate has no HTTP or database dependencies. The
//! SQLite backend, the model client and the terminal UI all depend on it; it
//! depends on nothing of theirs.

// Native `async fn` in traits; the `Send` bounds are spelled out on the
// returned futures instead.
#![allow(async_fn_in_trait)]

pub mod chart;
pub mod error;
pub mod prompt;
pub mod relation;
pub mod session;
pub mod store;
pub mod table;

pub use error::{Error, Result};
