//! SQLite backend for the Veil personal information store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Raw PII lands on disk as plain
//! SQLite text; deployments needing encryption at rest should put the
//! database file on an encrypted volume.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
