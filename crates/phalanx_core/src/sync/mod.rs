//! # Synchronization Gates
//!
//! Every shared resource inside a parallel region is routed through exactly
//! one of these:
//!
//! ```text
//! composite update, I/O ────────> CriticalGate   (one worker at a time)
//! single-variable RMW ──────────> Atomic*Cell    (indivisible, no blocking)
//! phase boundary ───────────────> Barrier        (all-or-nothing release)
//! sequential replay ────────────> OrderedSequencer (strict index order)
//! multiple independent resources> LockHandle     (one lock per resource)
//! ```
//!
//! Nothing in this crate shares a mutable variable across workers without
//! one of these gates.

mod atomic;
mod barrier;
mod critical;
mod lock;
mod ordered;

pub use atomic::{AtomicBoolCell, AtomicF64Cell, AtomicI64Cell, BoolOp, FloatOp, IntOp};
pub use barrier::Barrier;
pub use critical::CriticalGate;
pub use lock::{LockGuard, LockHandle};
pub use ordered::OrderedSequencer;
