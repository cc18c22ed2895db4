//! # Reductions
//!
//! Each worker gets a private accumulator seeded with the operator's
//! identity element; worker-local code folds into its own slot with no
//! synchronization (the slots are disjoint by construction), and the region
//! exit combines the per-worker values into the caller's result in
//! ascending worker-id order.
//!
//! The combine order is fixed so integer/logical reductions are
//! bit-reproducible across runs at a given team size; floating-point
//! results are order-insensitive only up to rounding.
//!
//! The operator must be associative. Because static partitioning assigns
//! different index sets at different team sizes, commutativity is assumed
//! in practice as well - every built-in constructor satisfies both.

/// An associative reduction operator with its identity element.
///
/// Built from the stock constructors (`sum`, `product`, `min`, `max`,
/// `all`, `any`) or from any associative `fn(T, T) -> T` via
/// [`Reducer::new`]. The trade: one private slot per worker costs memory
/// proportional to the team, and buys zero contention during the loop.
#[derive(Debug, Clone, Copy)]
pub struct Reducer<T> {
    identity: T,
    combine: fn(T, T) -> T,
}

impl<T: Clone> Reducer<T> {
    /// Builds a reducer from an identity element and an associative
    /// combine function.
    pub fn new(identity: T, combine: fn(T, T) -> T) -> Self {
        Self { identity, combine }
    }

    /// The identity element: the seed of every private accumulator, and
    /// the result of reducing an empty range (a degenerate input, not an
    /// error).
    pub fn identity(&self) -> T {
        self.identity.clone()
    }

    /// Combines two partial values.
    pub fn apply(&self, a: T, b: T) -> T {
        (self.combine)(a, b)
    }

    /// Folds a sequence of per-worker partial values, in order, onto the
    /// identity.
    pub fn fold(&self, parts: impl IntoIterator<Item = T>) -> T {
        parts
            .into_iter()
            .fold(self.identity(), |acc, part| self.apply(acc, part))
    }
}

impl Reducer<i64> {
    /// Integer sum; identity 0.
    #[must_use]
    pub fn sum() -> Self {
        Self::new(0, |a, b| a.wrapping_add(b))
    }

    /// Integer product; identity 1.
    #[must_use]
    pub fn product() -> Self {
        Self::new(1, |a, b| a.wrapping_mul(b))
    }

    /// Integer minimum; identity `i64::MAX`.
    #[must_use]
    pub fn min() -> Self {
        Self::new(i64::MAX, std::cmp::min)
    }

    /// Integer maximum; identity `i64::MIN`.
    #[must_use]
    pub fn max() -> Self {
        Self::new(i64::MIN, std::cmp::max)
    }
}

impl Reducer<f64> {
    /// Float sum; identity 0.0.
    #[must_use]
    pub fn sum_f64() -> Self {
        Self::new(0.0, |a, b| a + b)
    }

    /// Float product; identity 1.0.
    #[must_use]
    pub fn product_f64() -> Self {
        Self::new(1.0, |a, b| a * b)
    }

    /// Float minimum; identity `+inf`.
    #[must_use]
    pub fn min_f64() -> Self {
        Self::new(f64::INFINITY, f64::min)
    }

    /// Float maximum; identity `-inf`.
    #[must_use]
    pub fn max_f64() -> Self {
        Self::new(f64::NEG_INFINITY, f64::max)
    }
}

impl Reducer<bool> {
    /// Logical AND; identity `true`. The result is `true` only if every
    /// contribution is `true`.
    #[must_use]
    pub fn all() -> Self {
        Self::new(true, |a, b| a && b)
    }

    /// Logical OR; identity `false`. The result is `true` if any
    /// contribution is `true`.
    #[must_use]
    pub fn any() -> Self {
        Self::new(false, |a, b| a || b)
    }
}
