//! Command-line arguments. Every lattice flag overrides the matching key of the
//! YAML configuration file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

/// Metropolis Monte Carlo for the 2-D Ising model on a torus
#[derive(Parser, Debug)]
#[command(name = "ising", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (off, trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: LevelFilter,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one lattice and stream one record per iteration to stdout
    Run(RunArgs),
    /// Run independent lattices over a list of inverse temperatures
    Scan(ScanArgs),
}

#[derive(Args, Debug, Default)]
pub struct LatticeArgs {
    /// Number of lattice rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Number of lattice columns
    #[arg(long)]
    pub cols: Option<usize>,

    /// RNG seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sweeps between two measurements
    #[arg(long)]
    pub sweeps_per_report: Option<usize>,

    /// Stop after this many iterations
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Disable the ordered-lattice stopping heuristic
    #[arg(long)]
    pub no_heuristic: bool,

    /// Sweep mode (random or checkerboard)
    #[arg(long)]
    pub mode: Option<String>,

    /// Iterations excluded from the summary averages
    #[arg(long)]
    pub warmup: Option<usize>,

    /// Maximum lag for the |m| autocorrelation estimate
    #[arg(long)]
    pub autocorrelation_max_lag: Option<usize>,

    /// Run checkerboard rows on one thread
    #[arg(long)]
    pub sequential: bool,

    /// Raise the stop signal after this many seconds
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<f64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub lattice: LatticeArgs,

    /// Inverse temperature
    #[arg(long)]
    pub beta: Option<f64>,

    /// Start from an all-up lattice instead of a random one
    #[arg(long)]
    pub cold_start: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub lattice: LatticeArgs,

    /// Comma-separated inverse temperatures, e.g. 0.2,0.4,0.6
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub betas: Vec<f64>,
}
