use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;

/// Dispatch a per-row closure over lattice rows, optionally in parallel.
///
/// Row `r` gets its own RNG `rngs[r]`, so the result does not depend on how rayon
/// schedules the work: the sequential and parallel paths return identical output.
/// The closure receives `(row, rng)` and its results are collected in row order.
///
/// When `sequential` is true, rows are processed on the current thread (no rayon
/// overhead, best when an outer level such as a beta scan already saturates all
/// cores).
pub fn par_over_rows<T, F>(rngs: &mut [Xoshiro256StarStar], sequential: bool, body: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, &mut Xoshiro256StarStar) -> T + Send + Sync,
{
    if sequential {
        rngs.iter_mut()
            .enumerate()
            .map(|(row, rng)| body(row, rng))
            .collect()
    } else {
        rngs.par_iter_mut()
            .enumerate()
            .map(|(row, rng)| body(row, rng))
            .collect()
    }
}
