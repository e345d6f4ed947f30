//! Error type for `veil-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] veil_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to replace a record under an unknown reference token.
  #[error("no personal data found for reference token {0:?}")]
  NotFound(String),

  #[error("reference token already in use: {0:?}")]
  DuplicateReferenceToken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
