//! # Salary Audit
//!
//! Statistics over a salary table in a single parallel pass: total, lowest,
//! highest, and three policy flags folded simultaneously. One reduction
//! with a tuple-like accumulator replaces five separate passes - each
//! worker audits its own chunk privately and the combine step merges the
//! partial audits in worker order.
//!
//! Rules:
//! 1. No salary below [`SALARY_FLOOR`].
//! 2. No salary above [`SALARY_CEILING`].
//! 3. No negative salary (data validity).

use phalanx_core::{CoreResult, Reducer, Team};

/// Minimum lawful salary.
pub const SALARY_FLOOR: f64 = 1500.0;

/// Maximum payable salary.
pub const SALARY_CEILING: f64 = 20_000.0;

/// Combined statistics and policy flags for one salary table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryAudit {
    /// Sum of all salaries.
    pub total: f64,
    /// Lowest salary seen (`+inf` for an empty table).
    pub lowest: f64,
    /// Highest salary seen (`-inf` for an empty table).
    pub highest: f64,
    /// True if any salary is below the floor.
    pub floor_violated: bool,
    /// True if any salary is above the ceiling.
    pub ceiling_violated: bool,
    /// True only if every salary is non-negative.
    pub all_valid: bool,
}

impl SalaryAudit {
    /// The reduction identity: the audit of an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0.0,
            lowest: f64::INFINITY,
            highest: f64::NEG_INFINITY,
            floor_violated: false,
            ceiling_violated: false,
            all_valid: true,
        }
    }

    /// The audit of a single salary.
    #[must_use]
    pub fn of(salary: f64) -> Self {
        Self {
            total: salary,
            lowest: salary,
            highest: salary,
            floor_violated: salary < SALARY_FLOOR,
            ceiling_violated: salary > SALARY_CEILING,
            all_valid: salary >= 0.0,
        }
    }
}

/// Associative merge of two partial audits.
fn merge(a: SalaryAudit, b: SalaryAudit) -> SalaryAudit {
    SalaryAudit {
        total: a.total + b.total,
        lowest: a.lowest.min(b.lowest),
        highest: a.highest.max(b.highest),
        floor_violated: a.floor_violated || b.floor_violated,
        ceiling_violated: a.ceiling_violated || b.ceiling_violated,
        all_valid: a.all_valid && b.all_valid,
    }
}

/// Audits `salaries` in one parallel reduction over the team.
///
/// # Errors
///
/// Propagates structural region errors from the runtime; the audit itself
/// has no failure modes (an empty table reduces to [`SalaryAudit::empty`]).
pub fn audit(team: &Team, salaries: &[f64]) -> CoreResult<SalaryAudit> {
    tracing::debug!(rows = salaries.len(), "salary audit start");
    let reducer = Reducer::new(SalaryAudit::empty(), merge);
    team.parallel_reduce(salaries.len(), &reducer, |_ctx, i| {
        SalaryAudit::of(salaries[i])
    })
}
