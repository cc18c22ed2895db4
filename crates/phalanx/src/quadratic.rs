//! # Quadratic Solver
//!
//! Roots of `a*x^2 + b*x + c = 0` for batches of coefficient triples.
//! Pure per-element work: the canonical payload for a statically
//! partitioned parallel loop.
//!
//! Degenerate inputs produce sentinel outcomes by policy: a negative
//! discriminant or a zero leading coefficient is a documented result
//! variant, and the numeric convenience [`root_sum`] maps both to `0.0`
//! rather than guessing a mathematical answer.

/// Outcome of solving one quadratic equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuadraticRoots {
    /// Two real roots (equal when the discriminant is zero).
    Real {
        /// `(-b + sqrt(delta)) / 2a`.
        x1: f64,
        /// `(-b - sqrt(delta)) / 2a`.
        x2: f64,
    },
    /// Negative discriminant; no real roots.
    NoRealRoots,
    /// Zero leading coefficient; not a quadratic.
    Degenerate,
}

/// Solves `a*x^2 + b*x + c = 0`.
#[must_use]
pub fn solve(a: f64, b: f64, c: f64) -> QuadraticRoots {
    if a == 0.0 {
        return QuadraticRoots::Degenerate;
    }
    let delta = b * b - 4.0 * a * c;
    if delta < 0.0 {
        return QuadraticRoots::NoRealRoots;
    }
    let sqrt_delta = delta.sqrt();
    QuadraticRoots::Real {
        x1: (-b + sqrt_delta) / (2.0 * a),
        x2: (-b - sqrt_delta) / (2.0 * a),
    }
}

/// Sum of the real roots, with the sentinel `0.0` for degenerate inputs.
#[must_use]
pub fn root_sum(a: f64, b: f64, c: f64) -> f64 {
    match solve(a, b, c) {
        QuadraticRoots::Real { x1, x2 } => x1 + x2,
        QuadraticRoots::NoRealRoots | QuadraticRoots::Degenerate => 0.0,
    }
}
