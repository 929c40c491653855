//! Single-slot lookahead cache.

use pagefeed_types::FetchOutcome;
use tracing::trace;

/// Holds at most one already-resolved "next segment" outcome.
///
/// This is not an LRU: the single slot exists to decouple "detect that more
/// content exists" from "render the currently displayed segment". The engine
/// renders segment N from a resolved slot while the fetch for segment N+1 is
/// being primed.
///
/// Writes are guarded by a generation check so a superseded fetch can never
/// overwrite the result of the fetch that replaced it, regardless of which
/// settles first.
#[derive(Debug, Default)]
pub struct PrefetchCache {
    slot: Option<FetchOutcome>,
    /// Generation of the outcome currently in the slot.
    generation: u64,
}

impl PrefetchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits `outcome` to the slot if `generation` is not older than the
    /// resident one. Returns whether the write happened.
    ///
    /// The caller is responsible for only offering outcomes whose generation
    /// is still the latest issued; stale generations are dropped here as a
    /// second line of defense.
    pub fn store(&mut self, generation: u64, outcome: FetchOutcome) -> bool {
        if self.slot.is_some() && generation < self.generation {
            trace!(
                generation,
                resident = self.generation,
                "prefetch cache: dropping stale outcome"
            );
            return false;
        }
        self.slot = Some(outcome);
        self.generation = generation;
        true
    }

    /// Returns and clears the slot.
    pub fn take(&mut self) -> Option<FetchOutcome> {
        self.slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Drops whatever the slot holds.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
