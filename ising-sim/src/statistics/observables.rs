use crate::error::{check_beta, Result};
use crate::geometry::Lattice;
use crate::spins::local_energy;

/// Per-site thermodynamic observables of one lattice configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservableSample {
    /// Mean of [`local_energy`] over all cells (twice the bond energy per site).
    pub energy: f64,
    /// Mean spin, in `[-1, 1]`.
    pub magnetization: f64,
    /// `beta^2 * (<e^2> - <e>^2)` over the cells of this configuration.
    pub specific_heat: f64,
}

impl ObservableSample {
    /// `energy` cut toward zero, as carried in the textual record.
    #[inline]
    pub fn energy_truncated(&self) -> i64 {
        self.energy.trunc() as i64
    }
}

/// Read-only pass over every cell of `lattice` at inverse temperature `beta`.
///
/// Sums are accumulated in `f64` and divided by `rows * cols` once at the end.
pub fn measure(lattice: &Lattice, beta: f64) -> Result<ObservableSample> {
    check_beta(beta)?;
    let n = lattice.n_spins() as f64;
    let mut energy_total = 0.0f64;
    let mut energy_sq = 0.0f64;
    let mut mag = 0.0f64;
    for (i, &s) in lattice.spins().iter().enumerate() {
        let e = local_energy(i, lattice) as f64;
        energy_total += e;
        energy_sq += e * e;
        mag += s as f64;
    }
    let energy = energy_total / n;
    let energy_sq = energy_sq / n;
    Ok(ObservableSample {
        energy,
        magnetization: mag / n,
        specific_heat: (energy_sq - energy * energy) * beta * beta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IsingError;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_ordered_lattice() {
        let lat = Lattice::uniform(5, 5, -1).unwrap();
        let s = measure(&lat, 2.0).unwrap();
        assert_relative_eq!(s.energy, -4.0);
        assert_relative_eq!(s.magnetization, -1.0);
        assert_relative_eq!(s.specific_heat, 0.0);
    }

    #[test]
    fn test_single_defect() {
        let mut lat = Lattice::uniform(3, 3, 1).unwrap();
        lat.set(4, -1).unwrap();
        let s = measure(&lat, 0.5).unwrap();
        // local energies: 4 (defect), -2 x4 (its neighbors), -4 x4 (corners)
        let e = (4.0 - 8.0 - 16.0) / 9.0;
        let e2 = (16.0 + 4.0 * 4.0 + 4.0 * 16.0) / 9.0;
        assert_relative_eq!(s.energy, e);
        assert_relative_eq!(s.magnetization, 7.0 / 9.0);
        assert_relative_eq!(s.specific_heat, (e2 - e * e) * 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_bad_beta() {
        let lat = Lattice::uniform(3, 3, 1).unwrap();
        assert!(matches!(
            measure(&lat, 0.0),
            Err(IsingError::InvalidParameter { name: "beta", .. })
        ));
        assert!(measure(&lat, -2.0).is_err());
    }

    proptest! {
        #[test]
        fn prop_magnetization_bounded(rows in 3usize..16, cols in 3usize..16, seed in any::<u64>(), beta in 0.01f64..5.0) {
            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
            let lat = Lattice::random(rows, cols, &mut rng).unwrap();
            let s = measure(&lat, beta).unwrap();
            prop_assert!((-1.0..=1.0).contains(&s.magnetization));
            prop_assert!((-4.0..=4.0).contains(&s.energy));
            prop_assert!(s.specific_heat >= -1e-9);
        }
    }
}
