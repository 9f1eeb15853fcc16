use std::sync::atomic::AtomicBool;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ising_sim::mcmc::{checkerboard_sweep, metropolis_sweep, row_rngs};
use ising_sim::{measure, Lattice, SimConfig, Simulation, Termination};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

const BETA: f64 = 0.44;

fn bench_sweeps(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    for l in [32usize, 128, 512] {
        let n_spins = (l * l) as u64;
        group.throughput(Throughput::Elements(n_spins));

        group.bench_with_input(BenchmarkId::new("random", l), &l, |b, &l| {
            let mut rng = Xoshiro256StarStar::seed_from_u64(42);
            let mut lat = Lattice::random(l, l, &mut rng).unwrap();
            b.iter(|| metropolis_sweep(black_box(&mut lat), BETA, &mut rng).unwrap());
        });

        for (name, sequential) in [("checkerboard_seq", true), ("checkerboard_par", false)] {
            group.bench_with_input(BenchmarkId::new(name, l), &l, |b, &l| {
                let mut rng = Xoshiro256StarStar::seed_from_u64(42);
                let mut lat = Lattice::random(l, l, &mut rng).unwrap();
                let mut rngs = row_rngs(l, 43);
                b.iter(|| {
                    checkerboard_sweep(black_box(&mut lat), BETA, &mut rngs, sequential).unwrap()
                });
            });
        }

        group.bench_with_input(BenchmarkId::new("measure", l), &l, |b, &l| {
            let mut rng = Xoshiro256StarStar::seed_from_u64(42);
            let lat = Lattice::random(l, l, &mut rng).unwrap();
            b.iter(|| measure(black_box(&lat), BETA).unwrap());
        });
    }
    group.finish();
}

fn bench_driver(c: &mut Criterion) {
    let interrupted = AtomicBool::new(false);
    c.bench_function("simulation_128x128_50_iterations", |b| {
        b.iter(|| {
            let config = SimConfig {
                rows: 128,
                cols: 128,
                beta: BETA,
                termination: Termination {
                    ordered_heuristic: false,
                    max_iterations: Some(50),
                },
                ..SimConfig::default()
            };
            let mut sim = Simulation::new(config).unwrap();
            sim.run(None, &interrupted, &|| {}).unwrap()
        });
    });
}

criterion_group!(benches, bench_sweeps, bench_driver);
criterion_main!(benches);
