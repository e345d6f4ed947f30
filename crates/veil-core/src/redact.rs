//! Redaction of domain values that embed reference tokens.
//!
//! A domain object that carries reference tokens in place of raw PII still
//! needs a hand when the underlying records are erased: the tokens it holds
//! become dangling. [`ContainsPersonalData`] lets such objects enumerate
//! their tokens and blank them out, and [`scrub`] drives both halves against
//! a store in one call.

use crate::store::PersonalInformationStore;

/// A value that holds reference tokens in place of raw personal data.
pub trait ContainsPersonalData {
  /// Every reference token embedded in this value.
  fn reference_tokens(&self) -> Vec<String>;

  /// Blank out the embedded tokens so the value no longer points at any
  /// stored record.
  fn redact(&mut self);
}

impl<T: ContainsPersonalData> ContainsPersonalData for Option<T> {
  fn reference_tokens(&self) -> Vec<String> {
    self.as_ref().map(T::reference_tokens).unwrap_or_default()
  }

  fn redact(&mut self) {
    if let Some(value) = self {
      value.redact();
    }
  }
}

impl<T: ContainsPersonalData> ContainsPersonalData for Vec<T> {
  fn reference_tokens(&self) -> Vec<String> {
    self.iter().flat_map(T::reference_tokens).collect()
  }

  fn redact(&mut self) {
    for value in self {
      value.redact();
    }
  }
}

/// Remove every record `value` references from `store`, then redact the
/// value itself.
///
/// Removal is idempotent, so scrubbing a value whose records are already
/// gone succeeds and just blanks the tokens.
pub async fn scrub<S, T>(store: &S, value: &mut T) -> Result<(), S::Error>
where
  S: PersonalInformationStore,
  T: ContainsPersonalData,
{
  for token in value.reference_tokens() {
    store.remove(&token).await?;
  }
  value.redact();
  Ok(())
}
