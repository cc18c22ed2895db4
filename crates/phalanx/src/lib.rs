//! # PHALANX Workloads
//!
//! Numeric payloads invoked through the core runtime's entry points. The
//! runtime neither interprets nor suppresses their value-level outcomes:
//! degenerate inputs (a quadratic with no real roots, a zero leading
//! coefficient) are sentinel results handled here, never structural faults.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod quadratic;
pub mod salary;

pub use quadratic::{root_sum, solve, QuadraticRoots};
pub use salary::{audit, SalaryAudit, SALARY_CEILING, SALARY_FLOOR};
