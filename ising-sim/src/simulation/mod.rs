pub mod scan;
pub mod sink;

pub use scan::run_beta_scan;
pub use sink::{ChannelSink, Frame, Report, ReportSink, SinkError, TextSink};

use std::sync::atomic::{AtomicBool, Ordering};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{debug, info, warn};

use crate::config::{SimConfig, SweepMode};
use crate::error::{IsingError, Result};
use crate::geometry::Lattice;
use crate::mcmc;
use crate::statistics::{measure, sokal_tau, AutocorrAccum, ObservableSample, Statistics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The external stop signal was raised.
    Interrupted,
    /// The ordered-lattice heuristic fired (see [`crate::config::Termination`]).
    OrderedHeuristic,
    /// `max_iterations` reports were produced.
    IterationLimit,
}

/// Driver state. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped(StopReason),
}

/// Time averages over the measured (post-warmup) iterations of a run.
///
/// Averages are `None` when no iteration was recorded. Counters are totals since
/// the simulation was constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub beta: f64,
    pub iterations: usize,
    pub sweeps: usize,
    pub accepted_flips: usize,
    pub stop_reason: StopReason,
    pub last_sample: Option<ObservableSample>,
    /// ⟨e⟩, same per-site convention as [`ObservableSample::energy`].
    pub mean_energy: Option<f64>,
    /// ⟨|m|⟩.
    pub mean_abs_magnetization: Option<f64>,
    /// Time average of [`ObservableSample::specific_heat`].
    pub mean_specific_heat: Option<f64>,
    /// `beta² N (⟨u²⟩ − ⟨u⟩²)` with `u` the bond energy per site.
    pub energy_fluctuation: Option<f64>,
    /// `beta N (⟨m²⟩ − ⟨|m|⟩²)`.
    pub susceptibility: Option<f64>,
    /// Accepted flips per trial.
    pub acceptance_rate: f64,
    /// Integrated autocorrelation time of |m|, in iterations.
    pub abs_magnetization_tau: Option<f64>,
    /// Reports the sink failed to take.
    pub sink_failures: usize,
}

/// Single-lattice Metropolis run: repeated sweeps, one measurement per
/// iteration, published to an optional sink until a stop condition holds.
pub struct Simulation {
    config: SimConfig,
    lattice: Lattice,
    rng: Xoshiro256StarStar,
    /// One per row, only populated in checkerboard mode.
    row_rngs: Vec<Xoshiro256StarStar>,
    iteration: usize,
    sweeps: usize,
    accepted: usize,
    sink_failures: usize,
    state: RunState,
}

impl Simulation {
    /// Validate `config` and hot-start a lattice from `config.seed`.
    ///
    /// The lattice is drawn from the same stream the random-site updates use
    /// afterwards, so a seed fixes the whole trajectory.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate_params()?;
        let mut rng = Xoshiro256StarStar::seed_from_u64(config.seed);
        let lattice = Lattice::random(config.rows, config.cols, &mut rng)?;
        Ok(Self::assemble(config, lattice, rng))
    }

    /// Start from an explicit lattice (e.g. a cold start). Its dimensions must
    /// match the configuration.
    pub fn with_lattice(config: SimConfig, lattice: Lattice) -> Result<Self> {
        config.validate_params()?;
        if lattice.rows() != config.rows || lattice.cols() != config.cols {
            return Err(IsingError::InvalidDimensions {
                rows: lattice.rows(),
                cols: lattice.cols(),
                reason: "lattice does not match configured rows and cols",
            });
        }
        let rng = Xoshiro256StarStar::seed_from_u64(config.seed);
        Ok(Self::assemble(config, lattice, rng))
    }

    fn assemble(config: SimConfig, lattice: Lattice, rng: Xoshiro256StarStar) -> Self {
        let row_rngs = match config.sweep_mode {
            SweepMode::Random => Vec::new(),
            SweepMode::Checkerboard => mcmc::row_rngs(config.rows, config.seed.wrapping_add(1)),
        };
        Self {
            config,
            lattice,
            rng,
            row_rngs,
            iteration: 0,
            sweeps: 0,
            accepted: 0,
            sink_failures: 0,
            state: RunState::Running,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of reports produced so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// One sweep in the configured mode; returns the accepted flips.
    pub fn sweep(&mut self) -> Result<usize> {
        let beta = self.config.beta;
        let accepted = match self.config.sweep_mode {
            SweepMode::Random => mcmc::metropolis_sweep(&mut self.lattice, beta, &mut self.rng)?,
            SweepMode::Checkerboard => mcmc::checkerboard_sweep(
                &mut self.lattice,
                beta,
                &mut self.row_rngs,
                self.config.sequential,
            )?,
        };
        self.sweeps += 1;
        self.accepted += accepted;
        Ok(accepted)
    }

    fn stop(&mut self, reason: StopReason) {
        info!(
            iteration = self.iteration,
            sweeps = self.sweeps,
            ?reason,
            "simulation stopped"
        );
        self.state = RunState::Stopped(reason);
    }

    /// One iteration of the driver.
    ///
    /// Polls `interrupted` first; if raised, or if the run already stopped, returns
    /// `Ok(None)` without touching the lattice. Otherwise performs
    /// `sweeps_per_report` sweeps, measures, hands the report to `sink` and
    /// evaluates the termination policy.
    pub fn advance<'s>(
        &mut self,
        sink: Option<&mut (dyn ReportSink + 's)>,
        interrupted: &AtomicBool,
    ) -> Result<Option<ObservableSample>> {
        if self.state != RunState::Running {
            return Ok(None);
        }
        if interrupted.load(Ordering::Relaxed) {
            self.stop(StopReason::Interrupted);
            return Ok(None);
        }

        for _ in 0..self.config.sweeps_per_report {
            self.sweep()?;
        }
        let sample = measure(&self.lattice, self.config.beta)?;

        if let Some(sink) = sink {
            let report = Report {
                iteration: self.iteration,
                sample,
                rows: self.lattice.rows(),
                cols: self.lattice.cols(),
                snapshot: self.lattice.spins(),
            };
            if let Err(e) = sink.publish(&report) {
                self.sink_failures += 1;
                warn!(iteration = self.iteration, error = %e, "report sink failed");
            }
        }

        self.iteration += 1;
        let term = &self.config.termination;
        if term.ordered_heuristic
            && self.iteration > self.lattice.n_spins()
            && sample.energy_truncated() <= -4
        {
            self.stop(StopReason::OrderedHeuristic);
        } else if term.max_iterations.is_some_and(|max| self.iteration >= max) {
            self.stop(StopReason::IterationLimit);
        }
        Ok(Some(sample))
    }

    /// Drive [`Simulation::advance`] until the run stops.
    ///
    /// `on_iteration` is called once per completed iteration (useful for progress
    /// bars). Without `max_iterations` or the ordered heuristic the run only ends
    /// through `interrupted`.
    pub fn run<'s>(
        &mut self,
        mut sink: Option<&mut (dyn ReportSink + 's)>,
        interrupted: &AtomicBool,
        on_iteration: &(dyn Fn() + Sync),
    ) -> Result<RunSummary> {
        let n_spins = self.lattice.n_spins() as f64;
        let beta = self.config.beta;
        debug!(
            rows = self.config.rows,
            cols = self.config.cols,
            beta,
            mode = ?self.config.sweep_mode,
            seed = self.config.seed,
            "starting run"
        );
        if !self.config.is_self_terminating() {
            warn!("no termination policy configured, run ends only on the stop signal");
        }

        let mut energy_stat = Statistics::new(1);
        let mut bond_stat = Statistics::new(1);
        let mut bond2_stat = Statistics::new(2);
        let mut abs_mag_stat = Statistics::new(1);
        let mut mag2_stat = Statistics::new(2);
        let mut cv_stat = Statistics::new(1);
        let mut abs_mag_ac = self.config.autocorrelation_max_lag.map(AutocorrAccum::new);
        let mut last_sample = None;

        loop {
            let iteration = self.iteration;
            let Some(sample) = self.advance(sink.as_deref_mut(), interrupted)? else {
                break;
            };
            on_iteration();
            last_sample = Some(sample);

            if iteration >= self.config.warmup_iterations {
                let abs_m = sample.magnetization.abs();
                energy_stat.update(sample.energy);
                bond_stat.update(sample.energy / 2.0);
                bond2_stat.update(sample.energy / 2.0);
                abs_mag_stat.update(abs_m);
                mag2_stat.update(sample.magnetization);
                cv_stat.update(sample.specific_heat);
                if let Some(acc) = abs_mag_ac.as_mut() {
                    acc.push(abs_m);
                }
            }
        }

        let stop_reason = match self.state {
            RunState::Stopped(reason) => reason,
            RunState::Running => unreachable!("advance returned None while running"),
        };

        let energy_fluctuation = bond_stat
            .average()
            .zip(bond2_stat.average())
            .map(|(u, u2)| beta * beta * n_spins * (u2 - u * u));
        let susceptibility = abs_mag_stat
            .average()
            .zip(mag2_stat.average())
            .map(|(m, m2)| beta * n_spins * (m2 - m * m));
        let trials = self.sweeps as f64 * n_spins;
        let abs_magnetization_tau = abs_mag_ac
            .filter(|acc| !acc.is_empty())
            .map(|acc| sokal_tau(&acc.finish()));

        Ok(RunSummary {
            beta,
            iterations: self.iteration,
            sweeps: self.sweeps,
            accepted_flips: self.accepted,
            stop_reason,
            last_sample,
            mean_energy: energy_stat.average(),
            mean_abs_magnetization: abs_mag_stat.average(),
            mean_specific_heat: cv_stat.average(),
            energy_fluctuation,
            susceptibility,
            acceptance_rate: if trials > 0.0 {
                self.accepted as f64 / trials
            } else {
                0.0
            },
            abs_magnetization_tau,
            sink_failures: self.sink_failures,
        })
    }
}
