//! # PHALANX Core Runtime
//!
//! From-scratch fork-join parallel execution substrate designed for:
//! - Scoped worker teams (fork on region entry, join on every exit path)
//! - Static block partitioning of index ranges
//! - Mutual exclusion, atomics, barriers, ordered replay, explicit locks
//! - Contention-free reductions and independent-task sections
//!
//! ## Architecture Rules
//!
//! 1. **No shared mutable state without a gate** - Every resource touched by
//!    more than one worker goes through a critical gate, an atomic cell, or a
//!    lock handle
//! 2. **Disjoint by construction** - Reduction slots and section results are
//!    partitioned by worker/task id and never contended
//! 3. **No stranded workers** - A structural violation poisons the region and
//!    wakes every blocked worker
//!
//! ## Example
//!
//! ```rust,ignore
//! use phalanx_core::{Team, TeamConfig};
//!
//! let team = Team::new(TeamConfig::with_team_size(4))?;
//! team.parallel_for(1_000_000, |_ctx, i| {
//!     a[i].set(x[i] * x[i] + y[i] * y[i] + z[i] * z[i]);
//! })?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod partition;
pub mod reduce;
pub mod sections;
pub mod sync;
pub mod team;

pub use config::{ScheduleKind, TeamConfig};
pub use error::{CoreError, CoreResult};
pub use partition::partition;
pub use reduce::Reducer;
pub use sections::Section;
pub use sync::{
    AtomicBoolCell, AtomicF64Cell, AtomicI64Cell, Barrier, BoolOp, CriticalGate, FloatOp, IntOp,
    LockGuard, LockHandle, OrderedSequencer,
};
pub use team::{RegionTiming, Team, WorkerCtx};
