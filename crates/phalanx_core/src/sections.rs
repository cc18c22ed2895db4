//! # Sections
//!
//! Independent-task fan-out: a fixed list of callables dispatched across
//! the team, one task per worker for the first `team_size` tasks, with
//! excess tasks picked up greedily by whichever worker finishes first.
//! No task is ever dropped. Results land in disjoint slots, returned in
//! task order; the dispatch does not return until every task completed
//! (the implicit barrier).

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::{CoreError, CoreResult};

/// One independently dispatchable unit of work producing a `T`.
pub type Section<T> = Box<dyn FnOnce() -> T + Send>;

/// Work-distribution state for one `sections` region.
///
/// Task `i < team_size` sits in worker `i`'s own slot; the rest queue on a
/// channel that closes once all tasks are handed out, so workers drain it
/// and stop.
pub(crate) struct Dispatcher<T> {
    slots: Vec<Mutex<Option<(usize, Section<T>)>>>,
    overflow: Receiver<(usize, Section<T>)>,
    results: Sender<(usize, T)>,
}

impl<T: Send> Dispatcher<T> {
    /// Splits `tasks` into per-worker slots plus the overflow queue, and
    /// opens the result channel.
    pub(crate) fn new(tasks: Vec<Section<T>>, team_size: usize) -> (Self, Receiver<(usize, T)>) {
        let (overflow_tx, overflow_rx) = unbounded();
        let (results_tx, results_rx) = unbounded();

        let slots: Vec<Mutex<Option<(usize, Section<T>)>>> =
            (0..team_size).map(|_| Mutex::new(None)).collect();
        for (index, task) in tasks.into_iter().enumerate() {
            if index < team_size {
                *slots[index].lock() = Some((index, task));
            } else {
                // The channel is unbounded and both ends live; the send
                // cannot fail here.
                let _ = overflow_tx.send((index, task));
            }
        }
        // Close the overflow queue: workers drain it to disconnection.
        drop(overflow_tx);

        (
            Self {
                slots,
                overflow: overflow_rx,
                results: results_tx,
            },
            results_rx,
        )
    }

    /// Runs worker `worker_id`'s share: its own slot first, then whatever
    /// is left in the overflow queue.
    pub(crate) fn work(&self, worker_id: usize) {
        if let Some((index, task)) = self.slots[worker_id].lock().take() {
            tracing::trace!(worker_id, task = index, "section start");
            let _ = self.results.send((index, task()));
        }
        while let Ok((index, task)) = self.overflow.recv() {
            tracing::trace!(worker_id, task = index, "section start (overflow)");
            let _ = self.results.send((index, task()));
        }
    }

    /// Collects all results in task order. Call after the region joined;
    /// every task has completed by then.
    pub(crate) fn collect(results: &Receiver<(usize, T)>, expected: usize) -> CoreResult<Vec<T>> {
        let mut indexed: Vec<(usize, T)> = results.try_iter().collect();
        if indexed.len() != expected {
            // Unreachable through Team::sections; kept as a tripwire for
            // direct misuse.
            return Err(CoreError::protocol(format!(
                "sections produced {} of {expected} results",
                indexed.len()
            )));
        }
        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, value)| value).collect())
    }
}
