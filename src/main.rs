//! `ising`: command-line front end for the `ising-sim` engine.
//!
//! ```bash
//! ising run --rows 128 --cols 128 --beta 0.6 --max-iterations 2000
//! ising scan --rows 32 --cols 32 --betas 0.2,0.3,0.4,0.44,0.5,0.6 --max-iterations 5000
//! ```

use std::io::{self, BufWriter, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use ising_sim::{run_beta_scan, Lattice, SimConfig, Simulation, TextSink};
use tracing::{info, warn};

mod args;
mod config;
mod output;
mod progress;

use args::{Cli, Command, LatticeArgs, RunArgs, ScanArgs};
use config::FileConfig;
use output::{log_summary, scan_row, setup_logging, SCAN_HEADER};
use progress::iteration_bar;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    let file = match cli.config.as_deref() {
        Some(path) => {
            info!("Reading configuration from: {}", path.display());
            FileConfig::load(path)?
        }
        None => FileConfig::default(),
    }
    .with_defaults();

    match cli.command {
        Command::Run(args) => run(&file, args, cli.quiet),
        Command::Scan(args) => scan(&file, args, cli.quiet),
    }
}

/// Stop flag, raised by a watchdog thread after `--time-limit` seconds.
fn stop_signal(args: &LatticeArgs) -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    if let Some(secs) = args.time_limit {
        if !secs.is_finite() || secs < 0.0 {
            bail!("--time-limit must be a non-negative number of seconds, got {secs}");
        }
        let watchdog = Arc::clone(&flag);
        thread::spawn(move || {
            thread::sleep(Duration::from_secs_f64(secs));
            watchdog.store(true, Ordering::Relaxed);
        });
    }
    Ok(flag)
}

fn check_termination(config: &SimConfig, args: &LatticeArgs) {
    if !config.is_self_terminating() && args.time_limit.is_none() {
        warn!("Neither --max-iterations, the ordered heuristic nor --time-limit is set; the run will not stop on its own");
    }
}

fn run(file: &FileConfig, args: RunArgs, quiet: bool) -> Result<()> {
    let config = file.to_sim_config(&args.lattice, args.beta)?;
    info!("Configuration: {:?}", config);
    check_termination(&config, &args.lattice);
    let interrupted = stop_signal(&args.lattice)?;

    let mut sim = if args.cold_start {
        let lattice = Lattice::uniform(config.rows, config.cols, 1)?;
        Simulation::with_lattice(config, lattice)?
    } else {
        Simulation::new(config)?
    };

    let pb = iteration_bar(
        sim.config().termination.max_iterations.map(|n| n as u64),
        quiet,
    )?;
    let stdout = io::stdout();
    let mut sink = TextSink::new(BufWriter::new(stdout.lock()));
    let summary = sim.run(Some(&mut sink), &interrupted, &|| pb.inc(1))?;
    pb.finish_and_clear();
    sink.into_inner()
        .flush()
        .wrap_err("Failed to flush record stream")?;

    log_summary(&summary);
    Ok(())
}

fn scan(file: &FileConfig, args: ScanArgs, quiet: bool) -> Result<()> {
    let betas = if args.betas.is_empty() {
        file.betas.clone().unwrap_or_default()
    } else {
        args.betas
    };
    if betas.is_empty() {
        bail!("No inverse temperatures given (use --betas or `betas:` in the configuration file)");
    }

    let base = file.to_sim_config(&args.lattice, None)?;
    info!("Scanning {} betas with base configuration: {:?}", betas.len(), base);
    check_termination(&base, &args.lattice);
    let interrupted = stop_signal(&args.lattice)?;

    let total = base
        .termination
        .max_iterations
        .map(|n| (n * betas.len()) as u64);
    let pb = iteration_bar(total, quiet)?;
    let summaries = run_beta_scan(&base, &betas, &interrupted, &|| pb.inc(1))?;
    pb.finish_and_clear();

    let mut out = io::stdout().lock();
    writeln!(out, "{SCAN_HEADER}")?;
    for s in &summaries {
        writeln!(out, "{}", scan_row(s))?;
    }
    Ok(())
}
