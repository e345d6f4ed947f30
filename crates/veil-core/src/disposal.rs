//! Scheduled disposal of expired records.

use std::sync::Arc;

use tracing::info;

use crate::{clock::Clock, store::PersonalInformationStore};

/// Removes every record whose `disposed_at` deadline has passed.
///
/// One [`run`](Self::run) is one complete sweep pass. Scheduling is the
/// caller's concern: invoke it from a cron-style job, a tokio interval, or a
/// test. The remover reads "now" from its injected [`Clock`], so sweeps are
/// deterministic under test.
pub struct DisposedPersonalDataRemover<S> {
  store: S,
  clock: Arc<dyn Clock>,
}

impl<S: PersonalInformationStore> DisposedPersonalDataRemover<S> {
  pub fn new(store: S, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }

  /// Sweep once, returning how many records were removed.
  ///
  /// Records becoming disposable after the sweep's `now` was read are picked
  /// up by the next run.
  pub async fn run(&self) -> Result<usize, S::Error> {
    let as_of = self.clock.now();

    let mut removed = 0;
    for record in self.store.find_disposable(as_of).await? {
      self.store.remove(&record.reference_token).await?;
      removed += 1;
    }

    if removed > 0 {
      info!(removed, %as_of, "removed disposed personal data");
    }
    Ok(removed)
  }
}
