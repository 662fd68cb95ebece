//! One-shot proximity interactions.
//!
//! An encounter fires when an actor comes within a fixed radius of a target.
//! Encounters are kept in a fixed order and a [`Cursor`] points at the one that
//! is pending. The cursor is the only authority on what has been consumed, so a
//! consumed encounter cannot fire again even if the actor re-enters its window.

use crate::assert_interval;

/// A symmetric proximity window around a target coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityTrigger {
    radius: f64,
}

impl ProximityTrigger {
    /// **Panics** if `radius` is negative or not finite
    pub fn new(radius: f64) -> Self {
        assert_interval!(radius, 0.0, f64::MAX);
        Self { radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether `actor` lies strictly inside the window around `target`, approaching from either side
    pub fn fires(&self, actor: f64, target: f64) -> bool {
        (actor - target).abs() < self.radius
    }
}

/// A monotonically advancing pointer into an ordered sequence of encounters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    index: usize,
    len: usize,
}

impl Cursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    /// Number of encounters consumed so far
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The index of the next pending encounter, if any remain
    pub fn pending(&self) -> Option<usize> {
        (self.index < self.len).then_some(self.index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.len
    }

    pub fn is_consumed(&self, ix: usize) -> bool {
        ix < self.index
    }

    /// Consume encounter `ix` if and only if it is the pending one
    ///
    /// **Returns** `false`, leaving the cursor untouched, for an encounter that was
    /// already consumed or that is not yet next in line
    pub fn consume(&mut self, ix: usize) -> bool {
        if self.pending() != Some(ix) {
            return false;
        }
        self.index += 1;
        true
    }

    /// Move back to the first encounter, at the start of a new episode
    pub fn rewind(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_window_is_symmetric_and_strict() {
        let trigger = ProximityTrigger::new(0.5);
        assert!(trigger.fires(2.6, 3.0), "fires approaching from below");
        assert!(trigger.fires(3.4, 3.0), "fires approaching from above");
        assert!(!trigger.fires(2.5, 3.0), "boundary is exclusive");
        assert!(!trigger.fires(10.0, 3.0), "far actor does not fire");
    }

    #[test]
    #[should_panic]
    fn negative_radius_rejected() {
        ProximityTrigger::new(-1.0);
    }

    #[test]
    fn cursor_consumes_once() {
        let mut cursor = Cursor::new(2);
        assert_eq!(cursor.pending(), Some(0), "starts at the first encounter");

        assert!(!cursor.consume(1), "cannot skip ahead");
        assert!(cursor.consume(0), "pending encounter consumed");
        assert!(!cursor.consume(0), "consumed encounter cannot fire again");
        assert!(cursor.is_consumed(0), "consumed query agrees");
        assert!(!cursor.is_consumed(1), "pending encounter is not consumed");

        assert!(cursor.consume(1), "second encounter consumed");
        assert!(cursor.is_exhausted(), "cursor exhausted");
        assert_eq!(cursor.pending(), None, "nothing pending");
        assert_eq!(cursor.index(), cursor.len(), "index never passes len");

        cursor.rewind();
        assert_eq!(cursor.index(), 0, "rewind resets the cursor");
    }

    #[test]
    fn empty_cursor_is_exhausted() {
        let cursor = Cursor::new(0);
        assert!(cursor.is_empty(), "no encounters");
        assert!(cursor.is_exhausted(), "exhausted from the start");
    }
}
