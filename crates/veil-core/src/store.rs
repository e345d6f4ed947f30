//! The `PersonalInformationStore` trait.
//!
//! The trait is implemented by storage backends (`veil-store-memory`,
//! `veil-store-sqlite`). Application code depends on this abstraction, not
//! on any concrete backend, so the place where raw PII lives can change
//! without touching domain logic.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::data::{PersonalData, RecordedPersonalData};

/// Abstraction over a personal information store backend.
///
/// The store works with three identifiers:
///
/// - a *personal token* identifies a data subject. It should be opaque and
///   disposable, never a natural key, so it cannot re-identify the person
///   after their records are erased;
/// - a *key name* names the semantic field being stored, unique per subject
///   only by convention (see [`put`](Self::put));
/// - a *reference token* identifies one stored record and is globally unique
///   across the whole store. It is the only identifier external systems
///   should persist in place of the raw value.
///
/// Each record is either active or absent. Deletion is immediate and total:
/// there is no tombstone state, and no operation may expose a deleted value
/// afterwards. Backends holding PII at rest should take the necessary
/// precautions to encrypt it.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes. Every call is one complete-or-fail unit of
/// work: a concurrent reader sees the store before or after a write, never a
/// partially applied one.
pub trait PersonalInformationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record `data` and return its reference token.
  ///
  /// The token is minted by the backend's generator unless the record
  /// carries a caller-supplied one, in which case that token is used
  /// verbatim and the call fails if it is already in use. `recorded_at` is
  /// stamped from the backend's clock.
  ///
  /// `put` gives no idempotency or uniqueness guarantee per
  /// `(personal_token, key_name)`: putting the same pair twice creates two
  /// independent records with distinct reference tokens, and
  /// [`find_one_by_key_name`](Self::find_one_by_key_name) returns whichever
  /// was recorded first. Callers that want one active record per key should
  /// [`replace`](Self::replace) an existing record instead of putting a new
  /// one.
  fn put(
    &self,
    data: PersonalData,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// Substitute the payload of the record stored under `reference_token`.
  ///
  /// The reference token is preserved; `recorded_at` is re-stamped to the
  /// replacement time, treating the new payload as a new fact superseding
  /// the old one. A caller-supplied reference token inside `data` is
  /// ignored. Fails if no record exists under `reference_token`.
  fn replace<'a>(
    &'a self,
    reference_token: &'a str,
    data: PersonalData,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The first active record matching both keys, in insertion order, or
  /// `None`.
  fn find_one_by_key_name<'a>(
    &'a self,
    personal_token: &'a str,
    key_name: &'a str,
  ) -> impl Future<Output = Result<Option<RecordedPersonalData>, Self::Error>>
  + Send
  + 'a;

  /// Direct lookup by reference token, or `None`.
  fn find_one_by_reference_token<'a>(
    &'a self,
    reference_token: &'a str,
  ) -> impl Future<Output = Result<Option<RecordedPersonalData>, Self::Error>>
  + Send
  + 'a;

  /// All active records for a subject, in insertion order. Empty — never an
  /// error — if the subject is unknown.
  fn find_by_personal_token<'a>(
    &'a self,
    personal_token: &'a str,
  ) -> impl Future<Output = Result<Vec<RecordedPersonalData>, Self::Error>>
  + Send
  + 'a;

  /// Delete every active record matching both keys; more than one may exist
  /// (see [`put`](Self::put)). No error if none match.
  fn remove_by_key_name<'a>(
    &'a self,
    personal_token: &'a str,
    key_name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete the record stored under `reference_token`. Idempotent; no error
  /// if the token is unknown.
  fn remove<'a>(
    &'a self,
    reference_token: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete every record for a subject — the right to erasure. Idempotent;
  /// no error if the subject is unknown.
  fn erase<'a>(
    &'a self,
    personal_token: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every active record whose `disposed_at` deadline has passed as of
  /// `as_of`. This is the scan primitive behind
  /// [`DisposedPersonalDataRemover`](crate::disposal::DisposedPersonalDataRemover);
  /// it does not remove anything itself.
  fn find_disposable(
    &self,
    as_of: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<RecordedPersonalData>, Self::Error>>
  + Send
  + '_;
}
