//! Error types for `veil-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// An operation that requires an existing identity (`replace`) targeted a
  /// reference token absent from the store. Absence in lookups is never an
  /// error; those return `None` or an empty sequence.
  #[error("no personal data found for reference token {0:?}")]
  NotFound(String),

  /// A caller-supplied reference token collided with a record already in the
  /// store. Reference tokens are globally unique.
  #[error("personal data already recorded under reference token {0:?}")]
  DuplicateReferenceToken(String),

  /// Malformed input at record-construction time.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
