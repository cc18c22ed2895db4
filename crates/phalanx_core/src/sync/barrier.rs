//! # Team Barrier
//!
//! Rendezvous point: no worker proceeds past [`Barrier::wait`] until every
//! registered worker has arrived. Release is all-or-nothing, and the barrier
//! resets for reuse:
//!
//! ```text
//! Open ──arrive──> Filling (1..T-1 arrived) ──last arrival──> Released
//!   ^                                                             │
//!   └──────────────────────── reset ──────────────────────────────┘
//! ```
//!
//! Every arrival before the release happens-before everything after it, for
//! every worker - the generation handoff under the internal mutex carries
//! the edge.

use parking_lot::{Condvar, Mutex};

use crate::error::{CoreError, CoreResult};

#[derive(Debug)]
struct BarrierState {
    /// Arrival count for the current generation.
    arrived: usize,
    /// Bumped on each release; waiters watch it change.
    generation: u64,
    /// Which worker ids have arrived this generation.
    arrived_ids: Vec<bool>,
    /// Set when the enclosing region is torn down by a violation.
    poisoned: bool,
}

/// Rendezvous barrier for a fixed-size worker team.
///
/// Sized to the team at region entry; the team size cannot change
/// mid-region. Double arrival by one worker before the release is a
/// [`CoreError::ProtocolViolation`] and poisons the barrier so no other
/// worker is left stranded.
#[derive(Debug)]
pub struct Barrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl Barrier {
    /// Creates a barrier released by `parties` arrivals.
    ///
    /// # Panics
    ///
    /// Panics if `parties == 0`.
    #[must_use]
    pub fn new(parties: usize) -> Self {
        assert!(parties > 0, "barrier requires at least one party");
        Self {
            parties,
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                arrived_ids: vec![false; parties],
                poisoned: false,
            }),
            cvar: Condvar::new(),
        }
    }

    /// Number of arrivals that release the barrier.
    #[must_use]
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Registers `worker_id` as arrived and blocks until all parties have.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ProtocolViolation`] if `worker_id` arrives twice in
    ///   one generation, or is not a registered party.
    /// - [`CoreError::RegionAborted`] if the barrier was poisoned while
    ///   waiting.
    pub fn wait(&self, worker_id: usize) -> CoreResult<()> {
        let mut state = self.state.lock();
        if state.poisoned {
            return Err(CoreError::RegionAborted);
        }
        if worker_id >= self.parties {
            state.poisoned = true;
            self.cvar.notify_all();
            return Err(CoreError::protocol(format!(
                "barrier arrival from worker {worker_id}, team size is {}",
                self.parties
            )));
        }
        if state.arrived_ids[worker_id] {
            state.poisoned = true;
            self.cvar.notify_all();
            return Err(CoreError::protocol(format!(
                "worker {worker_id} arrived twice before the barrier released"
            )));
        }

        state.arrived_ids[worker_id] = true;
        state.arrived += 1;

        if state.arrived == self.parties {
            // Last arrival: release everyone and reset for reuse.
            state.arrived = 0;
            state.arrived_ids.fill(false);
            state.generation = state.generation.wrapping_add(1);
            tracing::trace!(parties = self.parties, "barrier released");
            self.cvar.notify_all();
            return Ok(());
        }

        let local_generation = state.generation;
        while state.generation == local_generation {
            if state.poisoned {
                return Err(CoreError::RegionAborted);
            }
            self.cvar.wait(&mut state);
        }
        Ok(())
    }

    /// Poisons the barrier, waking every blocked worker with
    /// [`CoreError::RegionAborted`].
    pub fn poison(&self) {
        let mut state = self.state.lock();
        state.poisoned = true;
        self.cvar.notify_all();
    }
}
