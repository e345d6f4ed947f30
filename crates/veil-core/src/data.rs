//! Personal data records — the input and stored forms.
//!
//! [`PersonalData`] is what the application hands to
//! [`put`](crate::store::PersonalInformationStore::put);
//! [`RecordedPersonalData`] is what the store hands back, with the minted
//! reference token and the recording timestamp. Once recorded, a record is
//! owned by the store and mutated only through
//! [`replace`](crate::store::PersonalInformationStore::replace).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, value::PiiValue};

/// Free-form auxiliary data attached to a record: third parties to notify on
/// a breach or on erasure, processing operations, consent agreement versions
/// (e.g. `user consent v2021-01-01`).
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// ─── PersonalData ────────────────────────────────────────────────────────────

/// Personal data to be saved in the store.
///
/// `personal_token` identifies the data subject. It must be opaque and
/// disposable — never a natural key that could re-identify the person after
/// their records are erased. `key_name` names the kind of value saved
/// (e.g. `emailAddress`, `phoneNumber`, `ipAddress`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalData {
  pub personal_token:          String,
  pub key_name:                String,
  pub value:                   PiiValue,
  /// Business identification of how the value was collected, e.g. a landing
  /// page contact form or an external organisation.
  pub source:                  String,
  /// Business reasons why the value is collected (marketing, CRM, analytics).
  pub reasons:                 Vec<String>,
  /// How the value is going to be processed; see
  /// [`GdprLawfulBasis`](crate::lawful_basis::GdprLawfulBasis) for common
  /// entries.
  pub processing_requirements: Vec<String>,
  /// When set, the record is eligible for automatic removal once the clock
  /// reaches this instant. When `None`, it persists until explicit removal
  /// or erasure.
  ///
  /// Doubles as a reservation: write provisional PII with `disposed_at` a
  /// few minutes out, then clear it via `replace` once the owning
  /// transaction commits. If the transaction never commits, the disposal
  /// sweep deletes the data on its own.
  pub disposed_at:             Option<DateTime<Utc>>,
  pub metadata:                Metadata,
  /// Caller-supplied reference token. When `None`, the store mints one.
  pub reference_token:         Option<String>,
}

impl PersonalData {
  /// Build a record with all optional fields at their defaults.
  ///
  /// Fails with [`Error::InvalidArgument`] if `personal_token` or `key_name`
  /// is empty.
  pub fn new(
    personal_token: impl Into<String>,
    key_name: impl Into<String>,
    value: impl Into<PiiValue>,
    source: impl Into<String>,
  ) -> Result<Self> {
    let personal_token = personal_token.into();
    let key_name = key_name.into();

    if personal_token.is_empty() {
      return Err(Error::InvalidArgument(
        "personal token cannot be empty".into(),
      ));
    }
    if key_name.is_empty() {
      return Err(Error::InvalidArgument("key name cannot be empty".into()));
    }

    Ok(Self {
      personal_token,
      key_name,
      value: value.into(),
      source: source.into(),
      reasons: Vec::new(),
      processing_requirements: Vec::new(),
      disposed_at: None,
      metadata: Metadata::new(),
      reference_token: None,
    })
  }

  /// Schedule the record for automatic disposal at `at`.
  #[must_use]
  pub fn disposed_at(mut self, at: DateTime<Utc>) -> Self {
    self.disposed_at = Some(at);
    self
  }

  #[must_use]
  pub fn reasons<I, S>(mut self, reasons: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.reasons = reasons.into_iter().map(Into::into).collect();
    self
  }

  #[must_use]
  pub fn processing_requirements<I, S>(mut self, requirements: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.processing_requirements =
      requirements.into_iter().map(Into::into).collect();
    self
  }

  #[must_use]
  pub fn metadata(mut self, metadata: Metadata) -> Self {
    self.metadata = metadata;
    self
  }

  /// Record under `token` instead of a store-minted reference token. The
  /// token must not already be in use.
  #[must_use]
  pub fn reference_token(mut self, token: impl Into<String>) -> Self {
    self.reference_token = Some(token.into());
    self
  }
}

// ─── RecordedPersonalData ────────────────────────────────────────────────────

/// The stored form of a record: the full payload plus the reference token it
/// lives under and the store-assigned recording timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPersonalData {
  /// Globally unique; the only identifier external systems should persist.
  pub reference_token:         String,
  pub personal_token:          String,
  pub key_name:                String,
  pub value:                   PiiValue,
  pub source:                  String,
  pub reasons:                 Vec<String>,
  pub processing_requirements: Vec<String>,
  pub disposed_at:             Option<DateTime<Utc>>,
  pub metadata:                Metadata,
  /// Assigned by the store at put and replace time; never caller-supplied.
  pub recorded_at:             DateTime<Utc>,
}

impl RecordedPersonalData {
  /// Whether the disposal deadline has passed as of `as_of`.
  pub fn is_disposable(&self, as_of: DateTime<Utc>) -> bool {
    self.disposed_at.is_some_and(|at| at <= as_of)
  }

  /// Rebuild the input form, e.g. to adjust fields and
  /// [`replace`](crate::store::PersonalInformationStore::replace) the
  /// record. The reference token is not carried over; `replace` takes it as
  /// its identity argument.
  pub fn to_personal_data(&self) -> PersonalData {
    PersonalData {
      personal_token: self.personal_token.clone(),
      key_name: self.key_name.clone(),
      value: self.value.clone(),
      source: self.source.clone(),
      reasons: self.reasons.clone(),
      processing_requirements: self.processing_requirements.clone(),
      disposed_at: self.disposed_at,
      metadata: self.metadata.clone(),
      reference_token: None,
    }
  }
}
