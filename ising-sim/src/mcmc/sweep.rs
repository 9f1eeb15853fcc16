use crate::error::{check_beta, IsingError, Result};
use crate::geometry::Lattice;
use crate::parallel::par_over_rows;
use crate::spins::local_energy;
use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

/// Boltzmann factors `exp(-beta * delta)` for the two positive energy changes a
/// single flip can cause on the square lattice (`delta` in {4, 8}).
#[derive(Debug, Clone, Copy)]
struct AcceptanceTable {
    w4: f64,
    w8: f64,
}

impl AcceptanceTable {
    fn new(beta: f64) -> Self {
        Self {
            w4: (-4.0 * beta).exp(),
            w8: (-8.0 * beta).exp(),
        }
    }

    /// Metropolis rule: always accept a downhill move, otherwise accept when
    /// `u < exp(-beta * delta)`.
    #[inline]
    fn accept(&self, delta: i32, u: f64) -> bool {
        match delta {
            d if d <= 0 => d < 0 || u < 1.0,
            4 => u < self.w4,
            _ => u < self.w8,
        }
    }
}

/// One single-spin-flip trial on a random cell. The caller has validated `beta`.
///
/// Draw order is fixed: one index draw, then one uniform acceptance draw, even
/// for a downhill move. A run is therefore reproducible from the seed alone.
#[inline]
fn trial<R: Rng + ?Sized>(lattice: &mut Lattice, table: &AcceptanceTable, rng: &mut R) -> Result<bool> {
    let i = rng.gen_range(0..lattice.n_spins());
    let delta = -2 * local_energy(i, lattice);
    let u: f64 = rng.gen();
    if table.accept(delta, u) {
        lattice.flip(i)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Metropolis single-spin-flip trial.
///
/// Picks a cell uniformly at random, computes the energy change `delta` of flipping
/// it, and accepts with probability `min(1, exp(-beta * delta))`. Returns whether the
/// flip was accepted.
pub fn metropolis_step<R: Rng + ?Sized>(lattice: &mut Lattice, beta: f64, rng: &mut R) -> Result<bool> {
    check_beta(beta)?;
    trial(lattice, &AcceptanceTable::new(beta), rng)
}

/// One sweep: exactly `rows * cols` calls of the Metropolis trial, with
/// replacement (a cell may be visited several times or not at all).
///
/// Returns the number of accepted flips.
#[cfg_attr(feature = "profile", inline(never))]
pub fn metropolis_sweep<R: Rng + ?Sized>(lattice: &mut Lattice, beta: f64, rng: &mut R) -> Result<usize> {
    check_beta(beta)?;
    let table = AcceptanceTable::new(beta);
    let mut accepted = 0;
    for _ in 0..lattice.n_spins() {
        if trial(lattice, &table, rng)? {
            accepted += 1;
        }
    }
    Ok(accepted)
}

/// Seed one RNG per row for [`checkerboard_sweep`], as `seed, seed+1, ...`.
pub fn row_rngs(rows: usize, seed: u64) -> Vec<Xoshiro256StarStar> {
    use rand::SeedableRng;
    (0..rows as u64)
        .map(|r| Xoshiro256StarStar::seed_from_u64(seed.wrapping_add(r)))
        .collect()
}

/// Systematic checkerboard sweep: one Metropolis trial on every "black" cell
/// (`row + col` even), then on every "white" cell.
///
/// Cells of one colour only neighbor cells of the other, so all trials of a
/// half-sweep read a frozen opposite colour and can run concurrently. Rows are
/// dispatched over rayon, each with its own RNG from `rngs`; flips are collected
/// and applied after the half-sweep. The result is independent of `sequential`.
///
/// Requires even `rows` and `cols` (otherwise the wrap-around joins two cells of
/// the same colour) and `rngs.len() == rows`.
#[cfg_attr(feature = "profile", inline(never))]
pub fn checkerboard_sweep(
    lattice: &mut Lattice,
    beta: f64,
    rngs: &mut [Xoshiro256StarStar],
    sequential: bool,
) -> Result<usize> {
    check_beta(beta)?;
    let (rows, cols) = (lattice.rows(), lattice.cols());
    if rows % 2 != 0 || cols % 2 != 0 {
        return Err(IsingError::InvalidDimensions {
            rows,
            cols,
            reason: "checkerboard sweep requires even rows and cols",
        });
    }
    if rngs.len() != rows {
        return Err(IsingError::InvalidParameter {
            name: "rngs",
            reason: format!("expected one RNG per row ({rows}), got {}", rngs.len()),
        });
    }

    let table = AcceptanceTable::new(beta);
    let mut accepted = 0;
    for colour in 0..2 {
        let frozen = &*lattice;
        let flips = par_over_rows(rngs, sequential, |row, rng| {
            let mut out = Vec::new();
            for col in ((row + colour) % 2..cols).step_by(2) {
                let i = row * cols + col;
                let delta = -2 * local_energy(i, frozen);
                let u: f64 = rng.gen();
                if table.accept(delta, u) {
                    out.push(i);
                }
            }
            out
        });
        for i in flips.into_iter().flatten() {
            lattice.flip(i)?;
            accepted += 1;
        }
    }
    Ok(accepted)
}
