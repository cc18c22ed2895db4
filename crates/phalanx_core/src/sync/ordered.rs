//! # Ordered Sequencer
//!
//! Re-serializes a designated block so it executes in strict index order
//! (0, 1, 2, ...) even though the surrounding loop body completes out of
//! order across workers. Only the designated block is serialized; everything
//! else in the iteration proceeds concurrently.
//!
//! Protocol: each index in `[0, n)` runs its ordered block exactly once.
//! A duplicated or out-of-range index is a violation and poisons the
//! sequencer; a skipped index is caught by [`OrderedSequencer::finish`] at
//! region join instead of deadlocking every later waiter.

use parking_lot::{Condvar, Mutex};

use crate::error::{CoreError, CoreResult};

#[derive(Debug)]
struct SequencerState {
    /// The only index currently allowed to run its ordered block.
    next: usize,
    /// Set when the enclosing region is torn down by a violation.
    poisoned: bool,
}

/// Strict index-order replay point for a parallel loop.
///
/// Sized to the loop's iteration count. A worker calling
/// [`OrderedSequencer::run_in_order`] with index `i` blocks until every
/// index below `i` has run its block.
#[derive(Debug)]
pub struct OrderedSequencer {
    limit: usize,
    state: Mutex<SequencerState>,
    cvar: Condvar,
}

impl OrderedSequencer {
    /// Creates a sequencer for indices `[0, limit)`.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            state: Mutex::new(SequencerState {
                next: 0,
                poisoned: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// The iteration count this sequencer replays.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs `body` once `index` is the next expected index, then advances
    /// the counter and wakes the waiter on `index + 1`.
    ///
    /// The body runs under the sequencer's internal gate; calling back into
    /// the same sequencer from inside it deadlocks.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ProtocolViolation`] if `index` was already executed
    ///   (duplicate) or is outside `[0, limit)`.
    /// - [`CoreError::RegionAborted`] if poisoned while waiting.
    pub fn run_in_order<R>(&self, index: usize, body: impl FnOnce() -> R) -> CoreResult<R> {
        let mut state = self.state.lock();
        if index >= self.limit {
            state.poisoned = true;
            self.cvar.notify_all();
            return Err(CoreError::protocol(format!(
                "ordered index {index} outside [0, {})",
                self.limit
            )));
        }

        loop {
            if state.poisoned {
                return Err(CoreError::RegionAborted);
            }
            if index < state.next {
                state.poisoned = true;
                self.cvar.notify_all();
                return Err(CoreError::protocol(format!(
                    "ordered index {index} executed twice"
                )));
            }
            if index == state.next {
                break;
            }
            self.cvar.wait(&mut state);
        }

        let result = body();
        state.next += 1;
        self.cvar.notify_all();
        Ok(result)
    }

    /// Verifies that the whole range was replayed; called at region join.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ProtocolViolation`] if an index was skipped.
    /// - [`CoreError::RegionAborted`] if the sequencer was poisoned.
    pub fn finish(&self) -> CoreResult<()> {
        let state = self.state.lock();
        if state.poisoned {
            return Err(CoreError::RegionAborted);
        }
        if state.next == self.limit {
            Ok(())
        } else {
            Err(CoreError::protocol(format!(
                "ordered replay stopped at index {} of {}",
                state.next, self.limit
            )))
        }
    }

    /// Poisons the sequencer, waking every blocked worker with
    /// [`CoreError::RegionAborted`].
    pub fn poison(&self) {
        let mut state = self.state.lock();
        state.poisoned = true;
        self.cvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ordered_emits_ascending() {
        // Workers complete out of order (reverse-staggered sleeps); the
        // ordered blocks still run 0, 1, 2, ...
        let n = 10;
        let sequencer = OrderedSequencer::new(n);
        let emitted = parking_lot::Mutex::new(Vec::new());

        std::thread::scope(|s| {
            for id in 0..4 {
                let sequencer = &sequencer;
                let emitted = &emitted;
                s.spawn(move || {
                    for i in (0..n).filter(|i| i % 4 == id) {
                        std::thread::sleep(Duration::from_millis((7 - (i as u64 % 8)) % 5));
                        sequencer
                            .run_in_order(i, || emitted.lock().push(i))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(*emitted.lock(), (0..n).collect::<Vec<_>>());
        sequencer.finish().unwrap();
    }

    #[test]
    fn test_ordered_duplicate_is_violation() {
        let sequencer = OrderedSequencer::new(3);
        sequencer.run_in_order(0, || ()).unwrap();
        let duplicate = sequencer.run_in_order(0, || ());
        assert!(matches!(
            duplicate,
            Err(CoreError::ProtocolViolation { .. })
        ));
        // Poisoned: later indices abort instead of hanging.
        assert_eq!(
            sequencer.run_in_order(1, || ()),
            Err(CoreError::RegionAborted)
        );
    }

    #[test]
    fn test_ordered_out_of_range_is_violation() {
        let sequencer = OrderedSequencer::new(2);
        assert!(matches!(
            sequencer.run_in_order(2, || ()),
            Err(CoreError::ProtocolViolation { .. })
        ));
    }

    #[test]
    fn test_ordered_skip_detected_at_finish() {
        let sequencer = OrderedSequencer::new(3);
        sequencer.run_in_order(0, || ()).unwrap();
        // Index 1 never runs.
        assert!(matches!(
            sequencer.finish(),
            Err(CoreError::ProtocolViolation { .. })
        ));
    }
}
