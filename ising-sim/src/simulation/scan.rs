use std::sync::atomic::AtomicBool;

use rayon::prelude::*;
use tracing::info;

use super::{RunSummary, Simulation};
use crate::config::SimConfig;
use crate::error::Result;

/// Run one independent [`Simulation`] per inverse temperature, in parallel.
///
/// Every run copies `base` with its own `beta` and a seed offset of
/// `k * (rows + 1)` for the `k`-th entry, which keeps the per-row checkerboard
/// streams of different runs disjoint. Checkerboard rows run sequentially inside
/// each run since the scan already saturates the pool. Summaries come back in the
/// order of `betas`; the first failing run's error is returned.
///
/// This is a plain sweep over temperatures. Runs never exchange configurations.
pub fn run_beta_scan(
    base: &SimConfig,
    betas: &[f64],
    interrupted: &AtomicBool,
    on_iteration: &(dyn Fn() + Sync),
) -> Result<Vec<RunSummary>> {
    let stride = base.rows as u64 + 1;
    let configs: Vec<SimConfig> = betas
        .iter()
        .enumerate()
        .map(|(k, &beta)| SimConfig {
            beta,
            seed: base.seed.wrapping_add(k as u64 * stride),
            sequential: true,
            ..base.clone()
        })
        .collect();

    for cfg in &configs {
        cfg.validate_params()?;
    }
    info!(n_runs = configs.len(), "starting beta scan");

    configs
        .into_par_iter()
        .map(|cfg| Simulation::new(cfg)?.run(None, interrupted, on_iteration))
        .collect()
}
