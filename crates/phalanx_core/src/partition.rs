//! # Static Partitioner
//!
//! Computes the fixed, contiguous block assignment of `[0, n)` to workers.
//! Chosen deliberately over dynamic/guided balancing: optimal when
//! per-iteration cost is uniform, as in element-wise numeric kernels.
//!
//! Invariant: the returned ranges form an exact, pairwise-disjoint cover of
//! `[0, n)` in ascending worker-id order. The first `n % team_size` workers
//! receive `ceil(n / team_size)` indices, the rest `floor(n / team_size)`.
//! With `n < team_size`, trailing workers receive an empty range and simply
//! perform no iterations - not an error.

use std::ops::Range;

/// Returns the static block partition of `[0, n)` for `team_size` workers.
///
/// # Panics
///
/// Panics if `team_size == 0`; a team always has at least one worker.
#[must_use]
pub fn partition(n: usize, team_size: usize) -> Vec<Range<usize>> {
    assert!(team_size > 0, "team_size must be greater than zero");
    (0..team_size).map(|id| chunk(n, team_size, id)).collect()
}

/// Returns worker `id`'s block of the static partition of `[0, n)`.
///
/// Same policy as [`partition`], computed without materializing the full
/// assignment.
///
/// # Panics
///
/// Panics if `id >= team_size`.
#[must_use]
pub fn chunk(n: usize, team_size: usize, id: usize) -> Range<usize> {
    assert!(id < team_size, "worker id out of range");
    let base = n / team_size;
    let extra = n % team_size;
    let lo = id * base + id.min(extra);
    let hi = lo + base + usize::from(id < extra);
    lo..hi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_exact_cover() {
        // Exhaustive small grid: union is [0, n), disjoint, ascending.
        for n in 0..64 {
            for team_size in 1..10 {
                let ranges = partition(n, team_size);
                assert_eq!(ranges.len(), team_size);

                let mut next = 0;
                for range in &ranges {
                    assert_eq!(range.start, next, "gap or overlap at n={n} t={team_size}");
                    assert!(range.start <= range.end);
                    next = range.end;
                }
                assert_eq!(next, n, "cover incomplete at n={n} t={team_size}");
            }
        }
    }

    #[test]
    fn test_partition_balance() {
        // Block sizes differ by at most one, larger blocks first.
        let ranges = partition(10, 4);
        let sizes: Vec<usize> = ranges.iter().map(|r| r.end - r.start).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_partition_degenerate_fewer_items_than_workers() {
        let ranges = partition(2, 4);
        assert_eq!(ranges[0], 0..1);
        assert_eq!(ranges[1], 1..2);
        assert!(ranges[2].is_empty());
        assert!(ranges[3].is_empty());
    }

    #[test]
    fn test_chunk_matches_partition() {
        for n in [0, 1, 7, 100, 1001] {
            for team_size in [1, 3, 8] {
                let ranges = partition(n, team_size);
                for (id, range) in ranges.iter().enumerate() {
                    assert_eq!(chunk(n, team_size, id), *range);
                }
            }
        }
    }
}
