//! # Critical Gate
//!
//! Serializes execution of an arbitrary code block across the whole team.
//! The block's contents are unrestricted: I/O, composite updates, calls into
//! other components - everything except re-entrant acquisition of the same
//! gate, which deadlocks.
//!
//! All gates in a single region share one exclusion domain
//! ([`crate::WorkerCtx::critical`]); independent domains are separate
//! `CriticalGate` values.

use parking_lot::Mutex;

/// Mutual exclusion gate for a block of code.
///
/// At most one worker executes inside [`CriticalGate::run`] at any instant.
/// Cheaper alternatives exist for single-variable updates
/// ([`crate::sync::AtomicI64Cell`] and friends); use the gate when the
/// update is composite or touches an unpartitioned resource.
#[derive(Debug, Default)]
pub struct CriticalGate {
    inner: Mutex<()>,
}

impl CriticalGate {
    /// Creates a new, open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `body` holding the gate; blocks until no other worker is inside.
    ///
    /// The gate is released on every exit path, including panics that unwind
    /// through `body`.
    pub fn run<R>(&self, body: impl FnOnce() -> R) -> R {
        let _guard = self.inner.lock();
        body()
    }
}
