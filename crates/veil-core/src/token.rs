//! Reference token minting.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Mints globally unique opaque reference tokens.
///
/// The default generator is backed by UUID v4. Substitute it only with
/// something equally unpredictable if reference tokens cross a trust
/// boundary.
pub trait ReferenceTokenGenerator: Send + Sync {
  fn generate(&self) -> String;
}

/// UUID v4 behind a `pii:` prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokenGenerator;

impl ReferenceTokenGenerator for UuidTokenGenerator {
  fn generate(&self) -> String { format!("pii:{}", Uuid::new_v4()) }
}

/// Counter-backed generator producing `pii:0`, `pii:1`, … for deterministic
/// tests. Not unpredictable; never use outside tests.
#[derive(Debug, Default)]
pub struct SequentialTokenGenerator {
  next: AtomicU64,
}

impl ReferenceTokenGenerator for SequentialTokenGenerator {
  fn generate(&self) -> String {
    format!("pii:{}", self.next.fetch_add(1, Ordering::Relaxed))
  }
}
