//! Two-phase region: every worker computes its chunk of roots, the team
//! rendezvous at the barrier, then every worker verifies results written by
//! the others. The barrier is what makes phase 2 sound - phase 1 writes are
//! visible to all workers after the shared release.

use phalanx::{solve, QuadraticRoots};
use phalanx_core::{AtomicF64Cell, Team, TeamConfig};

#[test]
fn two_phase_compute_then_verify() {
    let n = 64;
    // x^2 - 5x + 6 = 0 for every equation: roots 3 and 2.
    let a = vec![1.0; n];
    let b = vec![-5.0; n];
    let c = vec![6.0; n];
    let roots: Vec<AtomicF64Cell> = (0..n).map(|_| AtomicF64Cell::new(f64::NAN)).collect();

    let team = Team::new(TeamConfig::with_team_size(4)).unwrap();
    team.region(|ctx| {
        // Phase 1: fill this worker's chunk.
        for i in ctx.chunk(n) {
            match solve(a[i], b[i], c[i]) {
                QuadraticRoots::Real { x1, .. } => roots[i].set(x1),
                QuadraticRoots::NoRealRoots | QuadraticRoots::Degenerate => roots[i].set(0.0),
            }
        }

        // No worker verifies until every worker has finished filling.
        ctx.barrier()?;

        // Phase 2: verify the whole table, including chunks other workers
        // wrote.
        for i in 0..n {
            assert!((roots[i].get() - 3.0).abs() < 1e-12, "root {i} missing");
        }
        Ok(())
    })
    .unwrap();
}

#[test]
fn barrier_reused_across_phases() {
    let n = 32;
    let stage = AtomicF64Cell::new(0.0);
    let team = Team::new(TeamConfig::with_team_size(4)).unwrap();

    team.region(|ctx| {
        for _ in ctx.chunk(n) {
            std::hint::spin_loop();
        }
        ctx.barrier()?;
        if ctx.id() == 0 {
            stage.set(1.0);
        }
        ctx.barrier()?;
        // Worker 0's write between the barriers is visible to everyone.
        assert!((stage.get() - 1.0).abs() < f64::EPSILON);
        Ok(())
    })
    .unwrap();
}
