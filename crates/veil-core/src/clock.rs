//! Clock capability.
//!
//! Stores stamp `recorded_at` and evaluate disposal eligibility against an
//! injected clock, never the ambient wall clock, so both are deterministic
//! under test.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

/// Source of "now".
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock pinned to an instant that tests move by hand.
#[derive(Debug)]
pub struct FixedClock {
  now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
  pub fn new(now: DateTime<Utc>) -> Self {
    Self { now: RwLock::new(now) }
  }

  pub fn set(&self, now: DateTime<Utc>) { *self.now.write() = now; }

  pub fn advance(&self, by: Duration) { *self.now.write() += by; }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { *self.now.read() }
}
