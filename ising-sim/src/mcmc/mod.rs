pub mod sweep;

pub use sweep::{checkerboard_sweep, metropolis_step, metropolis_sweep, row_rngs};
