//! # Explicit Lock Handles
//!
//! Long-lived mutual-exclusion objects independent of any single parallel
//! region. Unlike the region-wide [`crate::sync::CriticalGate`] domain, a
//! program creates one `LockHandle` per independent resource, so worker
//! subsets updating different resources never contend with each other.
//!
//! Two protocols are offered:
//! - [`LockHandle::acquire`] returns a scoped [`LockGuard`]; the release is
//!   paired on every exit path, including early returns and unwinds.
//! - [`LockHandle::acquire_raw`] / [`LockHandle::release_raw`] mirror the
//!   manual init/set/unset/destroy discipline; misuse is caught and
//!   reported as [`CoreError::IllegalState`].

use parking_lot::{Condvar, Mutex};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Default)]
struct LockState {
    /// Token of the current holder, `None` while free. Held state is
    /// binary: acquires never outnumber releases.
    holder: Option<usize>,
}

/// Explicit mutual-exclusion handle for one shared resource.
#[derive(Debug, Default)]
pub struct LockHandle {
    state: Mutex<LockState>,
    cvar: Condvar,
}

impl LockHandle {
    /// Creates a new, free lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the lock is currently held.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.state.lock().holder.is_some()
    }

    /// Blocks until the lock is free, then acquires it for `holder` and
    /// returns a guard that releases on drop.
    ///
    /// `holder` is an arbitrary caller token - inside a region, the worker
    /// id. Re-acquiring while already holding deadlocks, as with any
    /// non-reentrant lock.
    #[must_use]
    pub fn acquire(&self, holder: usize) -> LockGuard<'_> {
        let mut state = self.state.lock();
        while state.holder.is_some() {
            self.cvar.wait(&mut state);
        }
        state.holder = Some(holder);
        LockGuard {
            handle: self,
            holder,
        }
    }

    /// Blocks until the lock is free, then acquires it for `holder`
    /// without a guard. Must be paired with [`LockHandle::release_raw`].
    pub fn acquire_raw(&self, holder: usize) {
        let mut state = self.state.lock();
        while state.holder.is_some() {
            self.cvar.wait(&mut state);
        }
        state.holder = Some(holder);
    }

    /// Releases a raw acquisition by `holder`.
    ///
    /// # Errors
    ///
    /// [`CoreError::IllegalState`] if the lock is not held, or is held by a
    /// different token.
    pub fn release_raw(&self, holder: usize) -> CoreResult<()> {
        let mut state = self.state.lock();
        match state.holder {
            None => Err(CoreError::illegal("release of a lock that is not held")),
            Some(current) if current != holder => Err(CoreError::illegal(format!(
                "release by token {holder}, lock held by {current}"
            ))),
            Some(_) => {
                state.holder = None;
                self.cvar.notify_one();
                Ok(())
            }
        }
    }

    /// Tears the lock down, consuming it.
    ///
    /// # Errors
    ///
    /// [`CoreError::IllegalState`] if the lock is still held.
    pub fn destroy(self) -> CoreResult<()> {
        if self.is_held() {
            return Err(CoreError::illegal("destroy of a lock that is still held"));
        }
        Ok(())
    }
}

/// Scoped acquisition of a [`LockHandle`]; releases on drop.
#[derive(Debug)]
pub struct LockGuard<'a> {
    handle: &'a LockHandle,
    holder: usize,
}

impl LockGuard<'_> {
    /// The token this guard was acquired with.
    #[must_use]
    pub fn holder(&self) -> usize {
        self.holder
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        // The guard is the proof of acquisition; this cannot fail.
        let mut state = self.handle.state.lock();
        state.holder = None;
        self.handle.cvar.notify_one();
    }
}
