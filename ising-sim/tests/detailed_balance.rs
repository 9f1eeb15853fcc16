//! The Metropolis chain must sample the Boltzmann distribution
//! `p(s) ∝ exp(-beta * H(s))`. Small tori are enumerated exactly and compared to
//! long-run empirical frequencies.

use std::collections::BTreeMap;

use ising_sim::mcmc::{checkerboard_sweep, metropolis_sweep, row_rngs};
use ising_sim::{neighbors, total_energy, Lattice};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Bond energy of the configuration encoded by `mask` (bit set = spin up).
fn energy_of_mask(mask: u32, rows: usize, cols: usize) -> i64 {
    let spin = |i: usize| if (mask >> i) & 1 == 1 { 1i64 } else { -1 };
    (0..rows * cols)
        .map(|i| {
            let nb = neighbors(i, rows, cols);
            -spin(i) * (spin(nb.right) + spin(nb.down))
        })
        .sum()
}

fn mask_of(lattice: &Lattice) -> u32 {
    lattice
        .spins()
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s == 1)
        .fold(0, |m, (i, _)| m | 1 << i)
}

/// Exact Boltzmann weight of every configuration, normalized.
fn exact_configurations(rows: usize, cols: usize, beta: f64) -> Vec<f64> {
    let n = rows * cols;
    let w: Vec<f64> = (0..1u32 << n)
        .map(|m| (-beta * energy_of_mask(m, rows, cols) as f64).exp())
        .collect();
    let z: f64 = w.iter().sum();
    w.into_iter().map(|x| x / z).collect()
}

/// Exact distribution of the total energy level.
fn exact_energy_levels(rows: usize, cols: usize, beta: f64) -> BTreeMap<i64, f64> {
    let mut levels = BTreeMap::new();
    for (m, p) in exact_configurations(rows, cols, beta).into_iter().enumerate() {
        *levels.entry(energy_of_mask(m as u32, rows, cols)).or_insert(0.0) += p;
    }
    levels
}

/// Exact distribution over (magnetization sum, total energy) classes.
fn exact_classes(rows: usize, cols: usize, beta: f64) -> BTreeMap<(i64, i64), f64> {
    let n = rows * cols;
    let mut classes = BTreeMap::new();
    for (m, p) in exact_configurations(rows, cols, beta).into_iter().enumerate() {
        let mag = 2 * (m as u32).count_ones() as i64 - n as i64;
        let h = energy_of_mask(m as u32, rows, cols);
        *classes.entry((mag, h)).or_insert(0.0) += p;
    }
    classes
}

fn total_variation<K: Ord + Copy>(
    exact: &BTreeMap<K, f64>,
    counts: &BTreeMap<K, u64>,
    n: u64,
) -> f64 {
    let mut keys: Vec<K> = exact.keys().chain(counts.keys()).copied().collect();
    keys.sort_unstable();
    keys.dedup();
    0.5 * keys
        .iter()
        .map(|k| {
            let p = exact.get(k).copied().unwrap_or(0.0);
            let q = counts.get(k).copied().unwrap_or(0) as f64 / n as f64;
            (p - q).abs()
        })
        .sum::<f64>()
}

#[test]
fn test_exact_enumeration_sanity() {
    let levels = exact_energy_levels(4, 4, 0.3);
    let total: f64 = levels.values().sum();
    assert!((total - 1.0).abs() < 1e-12);
    // ground states: all up / all down, H = -32
    assert!(levels.contains_key(&-32));
    assert_eq!(energy_of_mask(0xFFFF, 4, 4), -32);
    assert_eq!(energy_of_mask(0, 4, 4), -32);
    let lat = Lattice::uniform(4, 4, 1).unwrap();
    assert_eq!(mask_of(&lat), 0xFFFF);
}

#[test]
fn test_random_site_energy_distribution_4x4() {
    let (rows, cols, beta) = (4, 4, 0.25);
    let exact = exact_energy_levels(rows, cols, beta);
    let exact_mean: f64 = exact.iter().map(|(&h, &p)| h as f64 * p).sum();

    let mut rng = Xoshiro256StarStar::seed_from_u64(2024);
    let mut lat = Lattice::random(rows, cols, &mut rng).unwrap();
    for _ in 0..1_000 {
        metropolis_sweep(&mut lat, beta, &mut rng).unwrap();
    }

    let n_samples = 200_000u64;
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    let mut sum_h = 0.0;
    for _ in 0..n_samples {
        metropolis_sweep(&mut lat, beta, &mut rng).unwrap();
        let h = total_energy(&lat);
        *counts.entry(h).or_insert(0) += 1;
        sum_h += h as f64;
    }

    let tvd = total_variation(&exact, &counts, n_samples);
    assert!(tvd < 0.02, "total variation distance {tvd}");
    let mean = sum_h / n_samples as f64;
    assert!(
        ((mean - exact_mean) / 16.0).abs() < 0.02,
        "mean energy per site {} vs exact {}",
        mean / 16.0,
        exact_mean / 16.0
    );
}

#[test]
fn test_random_site_class_distribution_4x4() {
    let (rows, cols, beta) = (4, 4, 0.25);
    let exact = exact_classes(rows, cols, beta);
    let total: f64 = exact.values().sum();
    assert!((total - 1.0).abs() < 1e-12);
    assert_eq!(exact.get(&(16, -32)), exact.get(&(-16, -32)));

    let mut rng = Xoshiro256StarStar::seed_from_u64(31);
    let mut lat = Lattice::random(rows, cols, &mut rng).unwrap();
    for _ in 0..1_000 {
        metropolis_sweep(&mut lat, beta, &mut rng).unwrap();
    }

    let n_samples = 300_000u64;
    let mut counts: BTreeMap<(i64, i64), u64> = BTreeMap::new();
    for _ in 0..n_samples {
        metropolis_sweep(&mut lat, beta, &mut rng).unwrap();
        let key = (lat.magnetization_sum(), total_energy(&lat));
        assert!(exact.contains_key(&key), "unreachable class {key:?}");
        *counts.entry(key).or_insert(0) += 1;
    }

    let tvd = total_variation(&exact, &counts, n_samples);
    assert!(tvd < 0.03, "total variation distance {tvd}");
}

#[test]
fn test_random_site_configuration_distribution_3x3() {
    let (rows, cols, beta) = (3, 3, 0.2);
    let exact = exact_configurations(rows, cols, beta);

    let mut rng = Xoshiro256StarStar::seed_from_u64(77);
    let mut lat = Lattice::random(rows, cols, &mut rng).unwrap();
    for _ in 0..1_000 {
        metropolis_sweep(&mut lat, beta, &mut rng).unwrap();
    }

    let n_samples = 400_000u64;
    let mut counts = vec![0u64; exact.len()];
    for _ in 0..n_samples {
        metropolis_sweep(&mut lat, beta, &mut rng).unwrap();
        counts[mask_of(&lat) as usize] += 1;
    }

    let tvd: f64 = 0.5
        * exact
            .iter()
            .zip(counts.iter())
            .map(|(&p, &c)| (p - c as f64 / n_samples as f64).abs())
            .sum::<f64>();
    assert!(tvd < 0.06, "total variation distance {tvd}");

    // up/down symmetry of the zero-field model
    let up = counts[0x1FF] as f64;
    let down = counts[0] as f64;
    assert!((up - down).abs() / (up + down) < 0.1, "up {up} down {down}");
}

#[test]
fn test_checkerboard_energy_distribution_4x4() {
    let (rows, cols, beta) = (4, 4, 0.25);
    let exact = exact_energy_levels(rows, cols, beta);

    let mut rng = Xoshiro256StarStar::seed_from_u64(5);
    let mut lat = Lattice::random(rows, cols, &mut rng).unwrap();
    let mut rngs = row_rngs(rows, 6);
    for _ in 0..1_000 {
        checkerboard_sweep(&mut lat, beta, &mut rngs, true).unwrap();
    }

    let n_samples = 200_000u64;
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for _ in 0..n_samples {
        checkerboard_sweep(&mut lat, beta, &mut rngs, true).unwrap();
        *counts.entry(total_energy(&lat)).or_insert(0) += 1;
    }

    let tvd = total_variation(&exact, &counts, n_samples);
    assert!(tvd < 0.03, "total variation distance {tvd}");
}
