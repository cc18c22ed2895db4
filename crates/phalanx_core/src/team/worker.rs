//! # Worker Context
//!
//! The per-worker view of a parallel region. Created when the region forks,
//! destroyed when it joins; owned exclusively by its worker.

use std::ops::Range;

use crate::error::CoreResult;
use crate::partition;

use super::RegionServices;

/// A worker's identity and services inside one parallel region.
///
/// Immutable for the region's duration. The id is dense: `0..team_size`,
/// with worker 0 always receiving the lowest partition indices.
#[derive(Debug, Clone, Copy)]
pub struct WorkerCtx<'region> {
    pub(crate) id: usize,
    pub(crate) team_size: usize,
    pub(crate) services: &'region RegionServices,
}

impl WorkerCtx<'_> {
    /// This worker's id, `0..team_size`.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Number of workers in the team.
    #[must_use]
    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// This worker's static block of `[0, n)`.
    ///
    /// Empty when `n < team_size` and this worker drew no indices - the
    /// worker simply performs no iterations.
    #[must_use]
    pub fn chunk(&self, n: usize) -> Range<usize> {
        partition::chunk(n, self.team_size, self.id)
    }

    /// Runs `body` inside the region's shared critical domain: at most one
    /// worker at a time, block contents unrestricted.
    pub fn critical<R>(&self, body: impl FnOnce() -> R) -> R {
        self.services.gate.run(body)
    }

    /// Waits at the region's barrier until every worker has arrived.
    ///
    /// # Errors
    ///
    /// Propagates barrier protocol violations and region aborts; see
    /// [`crate::sync::Barrier::wait`].
    pub fn barrier(&self) -> CoreResult<()> {
        self.services.barrier.wait(self.id)
    }
}
