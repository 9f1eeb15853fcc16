//! YAML run configuration.
//!
//! Every key is optional; missing keys take the library defaults, and
//! command-line flags override both.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{eyre, Result, WrapErr};
use ising_sim::{SimConfig, SweepMode, Termination};
use serde::{Deserialize, Serialize};

use crate::args::LatticeArgs;

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub beta: Option<f64>,
    pub seed: Option<u64>,
    pub sweeps_per_report: Option<usize>,
    pub max_iterations: Option<usize>,
    pub ordered_heuristic: Option<bool>,
    pub sweep_mode: Option<String>,
    pub warmup_iterations: Option<usize>,
    pub autocorrelation_max_lag: Option<usize>,
    pub sequential: Option<bool>,
    /// Used by `scan` when `--betas` is absent.
    pub betas: Option<Vec<f64>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;
        serde_yml::from_str(&content).wrap_err("Failed to parse configuration file")
    }

    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let d = SimConfig::default();
        self.rows.get_or_insert(d.rows);
        self.cols.get_or_insert(d.cols);
        self.beta.get_or_insert(d.beta);
        self.seed.get_or_insert(d.seed);
        self.sweeps_per_report.get_or_insert(d.sweeps_per_report);
        self.ordered_heuristic
            .get_or_insert(d.termination.ordered_heuristic);
        self.sweep_mode.get_or_insert_with(|| "random".to_string());
        self.warmup_iterations.get_or_insert(d.warmup_iterations);
        self.sequential.get_or_insert(d.sequential);
        self
    }

    /// Merge command-line overrides and build the library configuration.
    pub fn to_sim_config(&self, args: &LatticeArgs, beta: Option<f64>) -> Result<SimConfig> {
        let d = SimConfig::default();
        let mode = args
            .mode
            .as_deref()
            .or(self.sweep_mode.as_deref())
            .unwrap_or("random");
        let sweep_mode = SweepMode::try_from(mode).map_err(|e| eyre!(e))?;

        Ok(SimConfig {
            rows: args.rows.or(self.rows).unwrap_or(d.rows),
            cols: args.cols.or(self.cols).unwrap_or(d.cols),
            beta: beta.or(self.beta).unwrap_or(d.beta),
            sweeps_per_report: args
                .sweeps_per_report
                .or(self.sweeps_per_report)
                .unwrap_or(d.sweeps_per_report),
            termination: Termination {
                ordered_heuristic: !args.no_heuristic
                    && self
                        .ordered_heuristic
                        .unwrap_or(d.termination.ordered_heuristic),
                max_iterations: args.max_iterations.or(self.max_iterations),
            },
            sweep_mode,
            seed: args.seed.or(self.seed).unwrap_or(d.seed),
            warmup_iterations: args
                .warmup
                .or(self.warmup_iterations)
                .unwrap_or(d.warmup_iterations),
            autocorrelation_max_lag: args
                .autocorrelation_max_lag
                .or(self.autocorrelation_max_lag),
            sequential: args.sequential || self.sequential.unwrap_or(d.sequential),
        })
    }
}
