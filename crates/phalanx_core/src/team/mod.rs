//! # Worker Team
//!
//! Fork-join execution over OS threads. A team owns nothing between
//! regions; opening a region spawns `team_size` workers bound to a shared
//! closure, and the region teardown joins them on every exit path -
//! including early returns and worker faults - before control returns to
//! the caller.
//!
//! ```text
//!  caller ──fork──> worker 0 ─┐
//!             ├──> worker 1 ─ ┤ region body (one closure, T contexts)
//!             ├──> ...      ─ ┤
//!             └──> worker T-1 ┘
//!  caller <─join── all workers returned, timing recorded
//! ```
//!
//! Inside a region the caller selects exactly one iteration shape:
//! [`Team::parallel_for`], [`Team::parallel_for_ordered`],
//! [`Team::parallel_reduce`], [`Team::sections`], or the raw
//! [`Team::region`] for phased bodies that use the barrier directly.

mod timing;
mod worker;

pub use timing::RegionTiming;
pub use worker::WorkerCtx;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::{ScheduleKind, TeamConfig};
use crate::error::{CoreError, CoreResult};
use crate::reduce::Reducer;
use crate::sections::{Dispatcher, Section};
use crate::sync::{Barrier, CriticalGate, OrderedSequencer};

/// Shared synchronization state owned by one region.
///
/// Built fresh at region entry, dropped at join. Poisoning releases every
/// blocked worker so a faulting region always tears down.
#[derive(Debug)]
pub(crate) struct RegionServices {
    pub(crate) barrier: Barrier,
    pub(crate) gate: CriticalGate,
    sequencer: Option<Arc<OrderedSequencer>>,
}

impl RegionServices {
    fn new(team_size: usize) -> Self {
        Self {
            barrier: Barrier::new(team_size),
            gate: CriticalGate::new(),
            sequencer: None,
        }
    }

    fn with_sequencer(team_size: usize, sequencer: Arc<OrderedSequencer>) -> Self {
        Self {
            barrier: Barrier::new(team_size),
            gate: CriticalGate::new(),
            sequencer: Some(sequencer),
        }
    }

    /// Wakes every worker blocked on a region service.
    fn poison(&self) {
        self.barrier.poison();
        if let Some(sequencer) = &self.sequencer {
            sequencer.poison();
        }
    }
}

/// Poisons the region services on drop unless disarmed.
///
/// A worker disarms it only after its body returns `Ok`, so both an `Err`
/// return and a panic unwinding out of the body wake every blocked
/// teammate before the join.
struct PoisonSentinel<'a> {
    services: &'a RegionServices,
    armed: bool,
}

impl Drop for PoisonSentinel<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.services.poison();
        }
    }
}

/// A fixed-size worker team for fork-join parallel regions.
///
/// The team is cheap: it holds configuration and the last region's timing,
/// not threads. Workers exist only between a region's fork and join.
#[derive(Debug)]
pub struct Team {
    team_size: usize,
    schedule: ScheduleKind,
    last_timing: Mutex<Option<RegionTiming>>,
}

impl Team {
    /// Builds a team from `config`.
    ///
    /// # Errors
    ///
    /// [`CoreError::ResourceExhausted`] if the resolved team size is zero
    /// or exceeds `config.max_team_size`.
    pub fn new(config: TeamConfig) -> CoreResult<Self> {
        let team_size = config.resolved_team_size();
        if team_size == 0 || team_size > config.max_team_size {
            return Err(CoreError::ResourceExhausted {
                requested: team_size,
                max: config.max_team_size,
            });
        }
        Ok(Self {
            team_size,
            schedule: config.schedule,
            last_timing: Mutex::new(None),
        })
    }

    /// Number of workers forked per region.
    #[must_use]
    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// The iteration scheduling policy (always `Static` in this core).
    #[must_use]
    pub fn schedule(&self) -> ScheduleKind {
        self.schedule
    }

    /// Opens a raw parallel region: every worker runs `body` once with its
    /// own context. Use this shape for phased bodies that mix per-worker
    /// loops ([`WorkerCtx::chunk`]) with [`WorkerCtx::barrier`] and
    /// [`WorkerCtx::critical`].
    ///
    /// # Errors
    ///
    /// The first structural error raised by any worker; secondary
    /// [`CoreError::RegionAborted`] wake-ups never mask the root cause.
    pub fn region<F>(&self, body: F) -> CoreResult<()>
    where
        F: Fn(&WorkerCtx<'_>) -> CoreResult<()> + Sync,
    {
        let services = RegionServices::new(self.team_size);
        self.run_region(&services, |ctx| body(ctx)).map(|_| ())
    }

    /// Parallel loop over `[0, n)` with static block partitioning: worker
    /// `id` runs `body` for each index in its contiguous chunk. Iteration
    /// order across workers is unspecified.
    ///
    /// # Errors
    ///
    /// As for [`Team::region`].
    pub fn parallel_for<F>(&self, n: usize, body: F) -> CoreResult<()>
    where
        F: Fn(&WorkerCtx<'_>, usize) + Sync,
    {
        self.region(|ctx| {
            for i in ctx.chunk(n) {
                body(ctx, i);
            }
            Ok(())
        })
    }

    /// Parallel loop over `[0, n)` where `work` runs concurrently and out
    /// of order, and `emit` replays each iteration's result in strict
    /// ascending index order.
    ///
    /// Every index calls the ordered block exactly once by construction;
    /// the sequencer is verified complete at join.
    ///
    /// # Errors
    ///
    /// As for [`Team::region`], plus [`CoreError::ProtocolViolation`] if
    /// the ordered replay did not cover the whole range.
    pub fn parallel_for_ordered<V, W, E>(&self, n: usize, work: W, emit: E) -> CoreResult<()>
    where
        W: Fn(&WorkerCtx<'_>, usize) -> V + Sync,
        E: Fn(&WorkerCtx<'_>, usize, V) + Sync,
    {
        let sequencer = Arc::new(OrderedSequencer::new(n));
        let services = RegionServices::with_sequencer(self.team_size, Arc::clone(&sequencer));

        self.run_region(&services, |ctx| {
            for i in ctx.chunk(n) {
                let value = work(ctx, i);
                sequencer.run_in_order(i, || emit(ctx, i, value))?;
            }
            Ok(())
        })?;

        sequencer.finish()
    }

    /// Parallel reduction over `[0, n)`: each worker folds `map(ctx, i)`
    /// for its chunk into a private accumulator seeded with the reducer's
    /// identity, and the per-worker values are combined in ascending
    /// worker-id order at join.
    ///
    /// An empty range yields the identity element.
    ///
    /// # Errors
    ///
    /// As for [`Team::region`].
    pub fn parallel_reduce<T, F>(&self, n: usize, reducer: &Reducer<T>, map: F) -> CoreResult<T>
    where
        T: Clone + Send + Sync,
        F: Fn(&WorkerCtx<'_>, usize) -> T + Sync,
    {
        let services = RegionServices::new(self.team_size);
        let parts = self.run_region(&services, |ctx| {
            let mut acc = reducer.identity();
            for i in ctx.chunk(n) {
                acc = reducer.apply(acc, map(ctx, i));
            }
            Ok(acc)
        })?;
        Ok(reducer.fold(parts))
    }

    /// Dispatches a fixed list of independent tasks across the team: task
    /// `i` to worker `i` for the first `team_size` tasks, excess tasks
    /// picked up greedily as workers free up. Returns the results in task
    /// order; does not return until every task has completed.
    ///
    /// # Errors
    ///
    /// As for [`Team::region`].
    pub fn sections<T: Send>(&self, tasks: Vec<Section<T>>) -> CoreResult<Vec<T>> {
        let count = tasks.len();
        tracing::debug!(tasks = count, team_size = self.team_size, "sections dispatch");
        let (dispatcher, results) = Dispatcher::new(tasks, self.team_size);

        let services = RegionServices::new(self.team_size);
        self.run_region(&services, |ctx| {
            dispatcher.work(ctx.id());
            Ok(())
        })?;

        drop(dispatcher);
        Dispatcher::collect(&results, count)
    }

    /// Time worker `id` spent inside the most recent region's body.
    #[must_use]
    pub fn elapsed_time(&self, id: usize) -> Option<Duration> {
        self.last_timing.lock().as_ref().and_then(|t| t.worker(id))
    }

    /// Fork-to-join wall time of the most recent region.
    #[must_use]
    pub fn total_elapsed_time(&self) -> Option<Duration> {
        self.last_timing.lock().as_ref().map(RegionTiming::total)
    }

    /// Full timing report of the most recent region.
    #[must_use]
    pub fn last_timing(&self) -> Option<RegionTiming> {
        self.last_timing.lock().clone()
    }

    /// Forks the team, runs `body` on every worker, joins, records timing,
    /// and returns the per-worker values in worker-id order.
    ///
    /// A panicking worker poisons the region on unwind; the panic is
    /// re-raised on the forking thread after every worker has joined.
    fn run_region<R, F>(&self, services: &RegionServices, body: F) -> CoreResult<Vec<R>>
    where
        R: Send,
        F: Fn(&WorkerCtx<'_>) -> CoreResult<R> + Sync,
    {
        tracing::debug!(
            team_size = self.team_size,
            schedule = ?self.schedule,
            "region fork"
        );
        let region_start = Instant::now();

        let outcomes: Vec<(CoreResult<R>, Duration)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.team_size)
                .map(|id| {
                    let body = &body;
                    scope.spawn(move || {
                        let ctx = WorkerCtx {
                            id,
                            team_size: self.team_size,
                            services,
                        };
                        let mut sentinel = PoisonSentinel {
                            services,
                            armed: true,
                        };
                        let start = Instant::now();
                        let outcome = body(&ctx);
                        sentinel.armed = outcome.is_err();
                        // An armed sentinel wakes everyone parked on a
                        // region service so the join below can complete.
                        drop(sentinel);
                        (outcome, start.elapsed())
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(outcome) => outcome,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });

        let total = region_start.elapsed();
        let mut per_worker = Vec::with_capacity(self.team_size);
        let mut values = Vec::with_capacity(self.team_size);
        let mut root_cause: Option<CoreError> = None;
        let mut aborted = false;

        for (outcome, elapsed) in outcomes {
            per_worker.push(elapsed);
            match outcome {
                Ok(value) => values.push(value),
                Err(CoreError::RegionAborted) => aborted = true,
                Err(error) => {
                    if root_cause.is_none() {
                        root_cause = Some(error);
                    }
                }
            }
        }

        *self.last_timing.lock() = Some(RegionTiming::new(per_worker, total));
        tracing::debug!(total_us = total.as_micros() as u64, "region join");

        if let Some(error) = root_cause {
            return Err(error);
        }
        if aborted {
            return Err(CoreError::RegionAborted);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::AtomicI64Cell;

    fn team(size: usize) -> Team {
        Team::new(TeamConfig::with_team_size(size)).unwrap()
    }

    #[test]
    fn test_new_rejects_oversized_team() {
        let config = TeamConfig {
            team_size: Some(10_000),
            ..TeamConfig::default()
        };
        assert!(matches!(
            Team::new(config),
            Err(CoreError::ResourceExhausted {
                requested: 10_000,
                ..
            })
        ));
    }

    #[test]
    fn test_new_rejects_zero_team() {
        let config = TeamConfig {
            team_size: Some(0),
            ..TeamConfig::default()
        };
        assert!(matches!(
            Team::new(config),
            Err(CoreError::ResourceExhausted { requested: 0, .. })
        ));
    }

    #[test]
    fn test_parallel_for_covers_every_index_once() {
        let team = team(4);
        let n = 1000;
        let hits: Vec<AtomicI64Cell> = (0..n).map(|_| AtomicI64Cell::new(0)).collect();

        team.parallel_for(n, |_ctx, i| hits[i].increment()).unwrap();

        assert!(hits.iter().all(|h| h.get() == 1));
    }

    #[test]
    fn test_region_runs_body_once_per_worker() {
        let team = team(3);
        let runs = AtomicI64Cell::new(0);
        team.region(|ctx| {
            assert!(ctx.id() < 3);
            assert_eq!(ctx.team_size(), 3);
            runs.increment();
            Ok(())
        })
        .unwrap();
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn test_region_records_timing() {
        let team = team(2);
        team.parallel_for(100, |_ctx, _i| {
            std::thread::sleep(std::time::Duration::from_micros(10));
        })
        .unwrap();

        assert!(team.total_elapsed_time().is_some());
        assert!(team.elapsed_time(0).is_some());
        assert!(team.elapsed_time(1).is_some());
        assert!(team.elapsed_time(2).is_none());
        assert_eq!(team.last_timing().unwrap().workers().len(), 2);
    }

    #[test]
    fn test_worker_error_aborts_region_with_root_cause() {
        let team = team(4);
        let result = team.region(|ctx| {
            if ctx.id() == 2 {
                // Structural fault in one worker; the others are parked at
                // the barrier and must be released, not stranded.
                return Err(CoreError::illegal("injected fault"));
            }
            ctx.barrier()?;
            Ok(())
        });
        assert_eq!(result, Err(CoreError::illegal("injected fault")));
    }

    #[test]
    fn test_panicking_worker_releases_barrier_waiters() {
        // A worker that unwinds never reaches the barrier; the others must
        // be woken and joined, and the panic re-raised to the caller,
        // instead of the region hanging.
        let team = team(4);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            team.region(|ctx| {
                if ctx.id() == 2 {
                    panic!("injected panic");
                }
                ctx.barrier()?;
                Ok(())
            })
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_parallel_reduce_sum_team_size_independent() {
        // Summing N unit values yields N regardless of team size.
        let n = 10_000;
        for size in [1, 2, 4, 8] {
            let team = team(size);
            let total = team
                .parallel_reduce(n, &Reducer::<i64>::sum(), |_ctx, _i| 1)
                .unwrap();
            assert_eq!(total, n as i64);
        }
    }

    #[test]
    fn test_parallel_reduce_empty_range_is_identity() {
        let team = team(4);
        let total = team
            .parallel_reduce(0, &Reducer::<i64>::min(), |_ctx, i| i as i64)
            .unwrap();
        assert_eq!(total, i64::MAX);
    }

    #[test]
    fn test_parallel_for_ordered_emits_ascending() {
        let team = team(4);
        let n = 25;
        let emitted = Mutex::new(Vec::new());
        team.parallel_for_ordered(
            n,
            |_ctx, i| i * i,
            |_ctx, i, value| {
                assert_eq!(value, i * i);
                emitted.lock().push(i);
            },
        )
        .unwrap();
        assert_eq!(*emitted.lock(), (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_sections_all_results_in_task_order() {
        let team = team(4);
        let tasks: Vec<Section<i64>> = (0..4_i64)
            .map(|i| Box::new(move || i * 100) as Section<i64>)
            .collect();
        assert_eq!(team.sections(tasks).unwrap(), vec![0, 100, 200, 300]);
    }

    #[test]
    fn test_sections_more_tasks_than_workers() {
        let team = team(2);
        let tasks: Vec<Section<usize>> = (0..7_usize)
            .map(|i| Box::new(move || i) as Section<usize>)
            .collect();
        assert_eq!(team.sections(tasks).unwrap(), (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_critical_in_region_serializes() {
        let team = team(4);
        let inside = std::sync::atomic::AtomicBool::new(false);
        team.parallel_for(2000, |ctx, _i| {
            ctx.critical(|| {
                assert!(!inside.swap(true, std::sync::atomic::Ordering::SeqCst));
                std::hint::spin_loop();
                inside.store(false, std::sync::atomic::Ordering::SeqCst);
            });
        })
        .unwrap();
    }
}
