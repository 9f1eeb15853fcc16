use rand::Rng;

use super::topology::{Neighbors, Topology};
use crate::error::{IsingError, Result};

/// Smallest extent along either axis for which every cell has four distinct
/// neighbors.
pub const MIN_EXTENT: usize = 3;

/// Periodic 2-D grid of ±1 spins.
///
/// Spins are stored row-major in one owned buffer, with the geometry (dimensions
/// and neighbor table) carried alongside. The buffer length is fixed at
/// construction and every element is always exactly `-1` or `+1`; the only way to
/// change a cell is [`Lattice::set`] (or [`Lattice::flip`], which goes through the
/// same checks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    topology: Topology,
    spins: Vec<i8>,
}

fn check_dims(rows: usize, cols: usize) -> Result<()> {
    if rows < MIN_EXTENT || cols < MIN_EXTENT {
        return Err(IsingError::InvalidDimensions {
            rows,
            cols,
            reason: "rows and cols must both be >= 3",
        });
    }
    // neighbor indices are stored as u32
    match rows.checked_mul(cols) {
        Some(n) if n <= u32::MAX as usize => Ok(()),
        _ => Err(IsingError::InvalidDimensions {
            rows,
            cols,
            reason: "rows * cols must fit in a u32 cell index",
        }),
    }
}

fn check_spin(value: i8) -> Result<()> {
    if value != 1 && value != -1 {
        return Err(IsingError::InvalidParameter {
            name: "spin",
            reason: format!("must be -1 or +1, got {value}"),
        });
    }
    Ok(())
}

impl Lattice {
    /// Hot start: every cell independently `-1` or `+1` with probability 1/2.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Self> {
        check_dims(rows, cols)?;
        let n_spins = rows * cols;
        let spins = (0..n_spins)
            .map(|_| if rng.gen::<f64>() < 0.5 { -1 } else { 1 })
            .collect();
        Ok(Self {
            topology: Topology::new(rows, cols),
            spins,
        })
    }

    /// Cold start: every cell set to `spin`.
    pub fn uniform(rows: usize, cols: usize, spin: i8) -> Result<Self> {
        check_dims(rows, cols)?;
        check_spin(spin)?;
        Ok(Self {
            topology: Topology::new(rows, cols),
            spins: vec![spin; rows * cols],
        })
    }

    /// Build from an explicit row-major configuration.
    pub fn from_spins(rows: usize, cols: usize, spins: Vec<i8>) -> Result<Self> {
        check_dims(rows, cols)?;
        if spins.len() != rows * cols {
            return Err(IsingError::InvalidDimensions {
                rows,
                cols,
                reason: "spin buffer length does not match rows * cols",
            });
        }
        for &s in &spins {
            check_spin(s)?;
        }
        Ok(Self {
            topology: Topology::new(rows, cols),
            spins,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.topology.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.topology.cols
    }

    #[inline]
    pub fn n_spins(&self) -> usize {
        self.topology.n_spins
    }

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Toroidal neighbors of cell `i`. Panics if `i` is out of range.
    #[inline]
    pub fn neighbors(&self, i: usize) -> Neighbors {
        self.topology.neighbors(i)
    }

    /// Row-major snapshot of the whole configuration.
    #[inline]
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    pub fn get(&self, i: usize) -> Result<i8> {
        self.spins.get(i).copied().ok_or(IsingError::OutOfRange {
            index: i,
            len: self.spins.len(),
        })
    }

    pub fn set(&mut self, i: usize, value: i8) -> Result<()> {
        check_spin(value)?;
        let len = self.spins.len();
        let cell = self
            .spins
            .get_mut(i)
            .ok_or(IsingError::OutOfRange { index: i, len })?;
        *cell = value;
        Ok(())
    }

    /// Reverse the sign of cell `i`.
    #[inline]
    pub fn flip(&mut self, i: usize) -> Result<()> {
        let s = self.get(i)?;
        self.set(i, -s)
    }

    /// Sum of all spins (`N * m`).
    pub fn magnetization_sum(&self) -> i64 {
        self.spins.iter().map(|&s| s as i64).sum()
    }
}
