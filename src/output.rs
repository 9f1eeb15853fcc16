//! Logging setup and summary formatting.

use ising_sim::RunSummary;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

/// Install the global `tracing` subscriber. Logs go to stderr so stdout carries
/// only the record stream.
pub fn setup_logging(level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{x:.4}"))
}

pub fn log_summary(s: &RunSummary) {
    info!(
        "Stopped after {} iterations ({} sweeps): {:?}",
        s.iterations, s.sweeps, s.stop_reason
    );
    info!("  beta:                 {}", s.beta);
    info!("  <e>:                  {}", fmt_opt(s.mean_energy));
    info!("  <|m|>:                {}", fmt_opt(s.mean_abs_magnetization));
    info!("  <specific heat>:      {}", fmt_opt(s.mean_specific_heat));
    info!("  energy fluctuation:   {}", fmt_opt(s.energy_fluctuation));
    info!("  susceptibility:       {}", fmt_opt(s.susceptibility));
    info!("  acceptance rate:      {:.4}", s.acceptance_rate);
    info!("  tau_int(|m|):         {}", fmt_opt(s.abs_magnetization_tau));
    if s.sink_failures > 0 {
        info!("  sink failures:        {}", s.sink_failures);
    }
}

/// One line of the `scan` table.
pub fn scan_row(s: &RunSummary) -> String {
    format!(
        "{:<8.4} {:<8} {:<9} {:<9} {:<9} {:<9} {:<9}",
        s.beta,
        s.iterations,
        fmt_opt(s.mean_energy),
        fmt_opt(s.mean_abs_magnetization),
        fmt_opt(s.energy_fluctuation),
        fmt_opt(s.susceptibility),
        format!("{:.4}", s.acceptance_rate),
    )
}

pub const SCAN_HEADER: &str = "beta     iters    e         |m|       c         chi       accept";
