pub mod autocorrelation;
pub mod observables;
mod stats;

pub use autocorrelation::{sokal_tau, AutocorrAccum};
pub use observables::{measure, ObservableSample};
pub use stats::Statistics;
