//! # Atomic Accumulators
//!
//! Indivisible read-modify-write cells for the restricted operation set
//! where hardware can do the whole update in one step. Faster than a
//! [`crate::sync::CriticalGate`] because no worker ever blocks - but only
//! single-variable, single-operator updates are eligible. Composite
//! expressions must use the gate instead.
//!
//! Integer and boolean cells map directly onto native `fetch_*`
//! instructions. The float cell has no native read-modify-write on any
//! mainstream target, so it runs a compare-exchange loop over the bit
//! pattern - the documented fallback path.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

/// Operations supported by [`AtomicI64Cell::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Bitwise AND.
    BitAnd,
    /// Bitwise OR.
    BitOr,
    /// Bitwise XOR.
    BitXor,
    /// Minimum of current value and operand.
    Min,
    /// Maximum of current value and operand.
    Max,
}

/// Operations supported by [`AtomicBoolCell::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
    /// Logical XOR.
    Xor,
}

/// Operations supported by [`AtomicF64Cell::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatOp {
    /// Addition.
    Add,
    /// Minimum of current value and operand.
    Min,
    /// Maximum of current value and operand.
    Max,
}

/// Shared `i64` accumulator with indivisible updates.
#[derive(Debug, Default)]
pub struct AtomicI64Cell {
    value: AtomicI64,
}

impl AtomicI64Cell {
    /// Creates a cell holding `value`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self {
            value: AtomicI64::new(value),
        }
    }

    /// Reads the current value.
    #[must_use]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Overwrites the current value.
    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::SeqCst);
    }

    /// Adds `operand` as a single indivisible step.
    pub fn add(&self, operand: i64) {
        self.value.fetch_add(operand, Ordering::SeqCst);
    }

    /// Increments by one.
    pub fn increment(&self) {
        self.add(1);
    }

    /// Decrements by one.
    pub fn decrement(&self) {
        self.value.fetch_sub(1, Ordering::SeqCst);
    }

    /// Applies `op` with `operand` as a single indivisible step.
    pub fn apply(&self, op: IntOp, operand: i64) {
        match op {
            IntOp::Add => {
                self.value.fetch_add(operand, Ordering::SeqCst);
            }
            IntOp::Sub => {
                self.value.fetch_sub(operand, Ordering::SeqCst);
            }
            IntOp::BitAnd => {
                self.value.fetch_and(operand, Ordering::SeqCst);
            }
            IntOp::BitOr => {
                self.value.fetch_or(operand, Ordering::SeqCst);
            }
            IntOp::BitXor => {
                self.value.fetch_xor(operand, Ordering::SeqCst);
            }
            IntOp::Min => {
                self.value.fetch_min(operand, Ordering::SeqCst);
            }
            IntOp::Max => {
                self.value.fetch_max(operand, Ordering::SeqCst);
            }
        }
    }
}

/// Shared `bool` flag with indivisible logical updates.
#[derive(Debug, Default)]
pub struct AtomicBoolCell {
    value: AtomicBool,
}

impl AtomicBoolCell {
    /// Creates a cell holding `value`.
    #[must_use]
    pub fn new(value: bool) -> Self {
        Self {
            value: AtomicBool::new(value),
        }
    }

    /// Reads the current value.
    #[must_use]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    /// Overwrites the current value.
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::SeqCst);
    }

    /// Applies `op` with `operand` as a single indivisible step.
    pub fn apply(&self, op: BoolOp, operand: bool) {
        match op {
            BoolOp::And => {
                self.value.fetch_and(operand, Ordering::SeqCst);
            }
            BoolOp::Or => {
                self.value.fetch_or(operand, Ordering::SeqCst);
            }
            BoolOp::Xor => {
                self.value.fetch_xor(operand, Ordering::SeqCst);
            }
        }
    }
}

/// Shared `f64` accumulator with indivisible updates.
///
/// Stored as raw bits in an `AtomicU64`; each update is a compare-exchange
/// loop, so concurrent adds never lose a contribution. Note that the
/// *result* of concurrent float addition still depends on arrival order up
/// to rounding - only the loss-freedom is guaranteed here.
#[derive(Debug)]
pub struct AtomicF64Cell {
    bits: AtomicU64,
}

impl AtomicF64Cell {
    /// Creates a cell holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    /// Reads the current value.
    #[must_use]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }

    /// Overwrites the current value.
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::SeqCst);
    }

    /// Adds `operand` as a single indivisible step.
    pub fn add(&self, operand: f64) {
        self.apply(FloatOp::Add, operand);
    }

    /// Applies `op` with `operand` as a single indivisible step.
    pub fn apply(&self, op: FloatOp, operand: f64) {
        let mut current = self.bits.load(Ordering::SeqCst);
        loop {
            let updated = match op {
                FloatOp::Add => f64::from_bits(current) + operand,
                FloatOp::Min => f64::from_bits(current).min(operand),
                FloatOp::Max => f64::from_bits(current).max(operand),
            };
            match self.bits.compare_exchange(
                current,
                updated.to_bits(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}

impl Default for AtomicF64Cell {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_int_cell_no_lost_updates() {
        // M concurrent adds land exactly M increments.
        let cell = AtomicI64Cell::new(0);
        thread::scope(|s| {
            for _ in 0..4 {
                let cell = &cell;
                s.spawn(move || {
                    for _ in 0..25_000 {
                        cell.increment();
                    }
                });
            }
        });
        assert_eq!(cell.get(), 100_000);
    }

    #[test]
    fn test_int_cell_ops() {
        let cell = AtomicI64Cell::new(0b1100);
        cell.apply(IntOp::BitAnd, 0b1010);
        assert_eq!(cell.get(), 0b1000);
        cell.apply(IntOp::BitOr, 0b0001);
        assert_eq!(cell.get(), 0b1001);
        cell.apply(IntOp::BitXor, 0b1111);
        assert_eq!(cell.get(), 0b0110);
        cell.apply(IntOp::Min, 2);
        assert_eq!(cell.get(), 2);
        cell.apply(IntOp::Max, 40);
        assert_eq!(cell.get(), 40);
        cell.apply(IntOp::Sub, 39);
        cell.decrement();
        assert_eq!(cell.get(), 0);
    }

    #[test]
    fn test_bool_cell_logical_ops() {
        let flag = AtomicBoolCell::new(true);
        flag.apply(BoolOp::And, true);
        assert!(flag.get());
        flag.apply(BoolOp::And, false);
        assert!(!flag.get());
        flag.apply(BoolOp::Or, true);
        assert!(flag.get());
        flag.apply(BoolOp::Xor, true);
        assert!(!flag.get());
    }

    #[test]
    fn test_float_cell_concurrent_add() {
        let cell = AtomicF64Cell::new(0.0);
        thread::scope(|s| {
            for _ in 0..4 {
                let cell = &cell;
                s.spawn(move || {
                    for _ in 0..10_000 {
                        cell.add(1.0);
                    }
                });
            }
        });
        // Unit contributions are exact in f64 well past 40 000.
        assert!((cell.get() - 40_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_float_cell_min_max() {
        let cell = AtomicF64Cell::new(5.0);
        cell.apply(FloatOp::Min, 3.5);
        assert!((cell.get() - 3.5).abs() < f64::EPSILON);
        cell.apply(FloatOp::Max, 9.25);
        assert!((cell.get() - 9.25).abs() < f64::EPSILON);
    }
}
