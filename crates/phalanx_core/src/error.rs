//! # Core Error Types
//!
//! All errors that can occur in the fork-join runtime.
//!
//! Structural violations (`ProtocolViolation`, `IllegalState`) are
//! unrecoverable for the enclosing region: the region is poisoned, every
//! blocked worker is woken with `RegionAborted`, and the join surfaces the
//! root cause. Value-level degeneracies (an empty reduction range, a solver
//! fed bad coefficients) are sentinel outcomes handled by the workload and
//! never travel through this enum.

use thiserror::Error;

/// Errors that can occur in the fork-join runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Requested team size outside the supported range.
    #[error("team size unsupported: requested {requested}, maximum {max}")]
    ResourceExhausted {
        /// The team size the caller asked for.
        requested: usize,
        /// The configured maximum.
        max: usize,
    },

    /// A synchronization protocol was broken: barrier double-arrival,
    /// ordered index skipped, duplicated or out of range.
    #[error("synchronization protocol violated: {what}")]
    ProtocolViolation {
        /// Description of the broken protocol step.
        what: String,
    },

    /// A lock was released or destroyed by a non-holder, or while not held.
    #[error("illegal lock state: {what}")]
    IllegalState {
        /// Description of the illegal transition.
        what: String,
    },

    /// The region was poisoned by a structural violation in another worker.
    ///
    /// Secondary wake-ups report this so the root cause is never masked;
    /// the region join prefers any other error over it.
    #[error("parallel region aborted by a failing worker")]
    RegionAborted,

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// Builds a `ProtocolViolation` from anything displayable.
    pub fn protocol(what: impl Into<String>) -> Self {
        Self::ProtocolViolation { what: what.into() }
    }

    /// Builds an `IllegalState` from anything displayable.
    pub fn illegal(what: impl Into<String>) -> Self {
        Self::IllegalState { what: what.into() }
    }
}

/// Result type for runtime operations.
pub type CoreResult<T> = Result<T, CoreError>;
