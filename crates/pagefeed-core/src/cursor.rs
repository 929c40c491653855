//! Segment position tracking.

/// Tracks the current segment index in the pagination sequence.
///
/// The cursor only ever moves forward through [`advance`](Self::advance),
/// which the engine calls exactly once per successful render cycle. The one
/// backward step, [`rewind_for_initial_fetch`](Self::rewind_for_initial_fetch),
/// exists to cancel out the unconditional advance of the same cycle when the
/// first request backfills every segment up to the configured start.
#[derive(Debug, Clone)]
pub struct SegmentCursor {
    current: u64,
}

impl SegmentCursor {
    /// Creates a cursor positioned at `start` (clamped to at least 1).
    pub fn new(start: u64) -> Self {
        Self {
            current: start.max(1),
        }
    }

    /// Currently displayed segment index.
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Index of the segment a fetch would target. Does not mutate.
    pub fn next(&self) -> u64 {
        self.current + 1
    }

    /// Moves to the next segment. Called only after a successful render.
    pub fn advance(&mut self) {
        self.current += 1;
    }

    /// Explicit override, clamped to at least 1.
    pub fn set(&mut self, segment: u64) {
        self.current = segment.max(1);
    }

    /// Steps back by one to offset the upcoming advance of an initial
    /// backfill cycle. Must be paired with an `advance` in the same cycle.
    pub fn rewind_for_initial_fetch(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one_at_minimum() {
        assert_eq!(SegmentCursor::new(0).current(), 1);
        assert_eq!(SegmentCursor::new(1).current(), 1);
        assert_eq!(SegmentCursor::new(7).current(), 7);
    }

    #[test]
    fn test_next_does_not_mutate() {
        let cursor = SegmentCursor::new(3);
        assert_eq!(cursor.next(), 4);
        assert_eq!(cursor.current(), 3);
    }

    #[test]
    fn test_advance_moves_by_one() {
        let mut cursor = SegmentCursor::new(1);
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current(), 3);
    }

    #[test]
    fn test_rewind_pairs_with_advance() {
        // Backfill: the rewind cancels out the unconditional advance, so the
        // configured start segment is what ends up displayed.
        let mut cursor = SegmentCursor::new(5);
        cursor.rewind_for_initial_fetch();
        assert_eq!(cursor.next(), 5);
        cursor.advance();
        assert_eq!(cursor.current(), 5);
    }

    #[test]
    fn test_rewind_saturates_at_zero() {
        let mut cursor = SegmentCursor::new(1);
        cursor.rewind_for_initial_fetch();
        cursor.rewind_for_initial_fetch();
        cursor.advance();
        assert_eq!(cursor.current(), 1);
    }

    #[test]
    fn test_set_clamps() {
        let mut cursor = SegmentCursor::new(4);
        cursor.set(0);
        assert_eq!(cursor.current(), 1);
        cursor.set(9);
        assert_eq!(cursor.current(), 9);
    }
}
