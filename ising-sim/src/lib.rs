//! Metropolis Monte Carlo for the ferromagnetic 2-D Ising model on a torus.
//!
//! The pieces, leaves first: [`Lattice`] stores the spins, [`neighbors`] resolves
//! the periodic 4-neighborhood, [`local_energy`] evaluates one cell,
//! [`metropolis_step`] performs a single-spin-flip trial, [`measure`] aggregates
//! per-site observables and [`Simulation`] drives repeated sweeps, publishing
//! each measurement to an optional [`ReportSink`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod parallel;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{SimConfig, SweepMode, Termination};
pub use error::{IsingError, Result};
pub use geometry::{neighbors, Lattice, Neighbors, Topology};
pub use mcmc::{checkerboard_sweep, metropolis_step, metropolis_sweep};
pub use simulation::{
    run_beta_scan, ChannelSink, Frame, Report, ReportSink, RunState, RunSummary, Simulation,
    SinkError, StopReason, TextSink,
};
pub use spins::{local_energy, total_energy};
pub use statistics::{measure, ObservableSample};
