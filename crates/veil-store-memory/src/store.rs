//! [`InMemoryStore`] — the in-process implementation of
//! [`PersonalInformationStore`].

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use veil_core::{
  Error, Result,
  clock::{Clock, SystemClock},
  data::{PersonalData, RecordedPersonalData},
  store::PersonalInformationStore,
  token::{ReferenceTokenGenerator, UuidTokenGenerator},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A personal information store holding every record in process memory.
///
/// Cloning is cheap; clones share the same records. Each trait method takes
/// the lock exactly once, so concurrent callers observe every operation as a
/// whole or not at all.
#[derive(Clone)]
pub struct InMemoryStore {
  clock:  Arc<dyn Clock>,
  tokens: Arc<dyn ReferenceTokenGenerator>,
  inner:  Arc<RwLock<Inner>>,
}

/// Records bucketed per subject, with a global reference-token index.
///
/// Buckets keep insertion order; `by_reference_token` maps each reference
/// token to its owning personal token. Every record is in exactly one bucket
/// and has exactly one index entry.
#[derive(Default)]
struct Inner {
  by_personal_token:  HashMap<String, Vec<RecordedPersonalData>>,
  by_reference_token: HashMap<String, String>,
}

impl InMemoryStore {
  /// An empty store reading time from `clock`, minting UUID-backed reference
  /// tokens.
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    Self {
      clock,
      tokens: Arc::new(UuidTokenGenerator),
      inner: Arc::new(RwLock::new(Inner::default())),
    }
  }

  /// Swap the reference token generator, e.g. for a deterministic one in
  /// tests.
  #[must_use]
  pub fn with_token_generator(
    mut self,
    tokens: Arc<dyn ReferenceTokenGenerator>,
  ) -> Self {
    self.tokens = tokens;
    self
  }

  fn build_record(
    &self,
    reference_token: String,
    data: PersonalData,
    recorded_at: DateTime<Utc>,
  ) -> RecordedPersonalData {
    RecordedPersonalData {
      reference_token,
      personal_token: data.personal_token,
      key_name: data.key_name,
      value: data.value,
      source: data.source,
      reasons: data.reasons,
      processing_requirements: data.processing_requirements,
      disposed_at: data.disposed_at,
      metadata: data.metadata,
      recorded_at,
    }
  }
}

impl Default for InMemoryStore {
  fn default() -> Self { Self::new(Arc::new(SystemClock)) }
}

// ─── PersonalInformationStore impl ───────────────────────────────────────────

impl PersonalInformationStore for InMemoryStore {
  type Error = Error;

  async fn put(&self, data: PersonalData) -> Result<String> {
    let recorded_at = self.clock.now();
    let mut guard = self.inner.write();
    let inner = &mut *guard;

    let reference_token = match &data.reference_token {
      Some(token) => {
        if inner.by_reference_token.contains_key(token) {
          return Err(Error::DuplicateReferenceToken(token.clone()));
        }
        token.clone()
      }
      None => self.tokens.generate(),
    };

    let record = self.build_record(reference_token.clone(), data, recorded_at);

    inner
      .by_reference_token
      .insert(reference_token.clone(), record.personal_token.clone());
    inner
      .by_personal_token
      .entry(record.personal_token.clone())
      .or_default()
      .push(record);

    debug!(%reference_token, "recorded personal data");
    Ok(reference_token)
  }

  async fn replace(
    &self,
    reference_token: &str,
    data: PersonalData,
  ) -> Result<()> {
    let recorded_at = self.clock.now();
    let mut guard = self.inner.write();
    let inner = &mut *guard;

    let Some(owner) = inner.by_reference_token.get(reference_token).cloned()
    else {
      return Err(Error::NotFound(reference_token.to_owned()));
    };

    let record =
      self.build_record(reference_token.to_owned(), data, recorded_at);

    if record.personal_token == owner {
      // Same subject: overwrite in place, keeping the record's position.
      if let Some(bucket) = inner.by_personal_token.get_mut(&owner) {
        if let Some(slot) =
          bucket.iter_mut().find(|r| r.reference_token == reference_token)
        {
          *slot = record;
        }
      }
    } else {
      // The replacement reassigns the record to another subject: move it to
      // the end of that subject's bucket and re-point the index.
      if let Some(bucket) = inner.by_personal_token.get_mut(&owner) {
        bucket.retain(|r| r.reference_token != reference_token);
        if bucket.is_empty() {
          inner.by_personal_token.remove(&owner);
        }
      }
      inner
        .by_reference_token
        .insert(reference_token.to_owned(), record.personal_token.clone());
      inner
        .by_personal_token
        .entry(record.personal_token.clone())
        .or_default()
        .push(record);
    }

    Ok(())
  }

  async fn find_one_by_key_name(
    &self,
    personal_token: &str,
    key_name: &str,
  ) -> Result<Option<RecordedPersonalData>> {
    let inner = self.inner.read();
    Ok(
      inner
        .by_personal_token
        .get(personal_token)
        .and_then(|bucket| bucket.iter().find(|r| r.key_name == key_name))
        .cloned(),
    )
  }

  async fn find_one_by_reference_token(
    &self,
    reference_token: &str,
  ) -> Result<Option<RecordedPersonalData>> {
    let inner = self.inner.read();
    Ok(inner.by_reference_token.get(reference_token).and_then(|owner| {
      inner
        .by_personal_token
        .get(owner)?
        .iter()
        .find(|r| r.reference_token == reference_token)
        .cloned()
    }))
  }

  async fn find_by_personal_token(
    &self,
    personal_token: &str,
  ) -> Result<Vec<RecordedPersonalData>> {
    let inner = self.inner.read();
    Ok(
      inner
        .by_personal_token
        .get(personal_token)
        .cloned()
        .unwrap_or_default(),
    )
  }

  async fn remove_by_key_name(
    &self,
    personal_token: &str,
    key_name: &str,
  ) -> Result<()> {
    let mut guard = self.inner.write();
    let Inner { by_personal_token, by_reference_token } = &mut *guard;

    if let Some(bucket) = by_personal_token.get_mut(personal_token) {
      bucket.retain(|r| {
        if r.key_name == key_name {
          by_reference_token.remove(&r.reference_token);
          false
        } else {
          true
        }
      });
      // An empty bucket would keep the personal token alive as a map key.
      if bucket.is_empty() {
        by_personal_token.remove(personal_token);
      }
    }
    Ok(())
  }

  async fn remove(&self, reference_token: &str) -> Result<()> {
    let mut guard = self.inner.write();
    let inner = &mut *guard;

    if let Some(owner) = inner.by_reference_token.remove(reference_token) {
      if let Some(bucket) = inner.by_personal_token.get_mut(&owner) {
        bucket.retain(|r| r.reference_token != reference_token);
        if bucket.is_empty() {
          inner.by_personal_token.remove(&owner);
        }
      }
    }
    Ok(())
  }

  async fn erase(&self, personal_token: &str) -> Result<()> {
    let mut guard = self.inner.write();
    let inner = &mut *guard;

    if let Some(bucket) = inner.by_personal_token.remove(personal_token) {
      for record in &bucket {
        inner.by_reference_token.remove(&record.reference_token);
      }
      info!(personal_token, removed = bucket.len(), "erased personal data");
    }
    Ok(())
  }

  async fn find_disposable(
    &self,
    as_of: DateTime<Utc>,
  ) -> Result<Vec<RecordedPersonalData>> {
    let inner = self.inner.read();
    Ok(
      inner
        .by_personal_token
        .values()
        .flatten()
        .filter(|r| r.is_disposable(as_of))
        .cloned()
        .collect(),
    )
  }
}
