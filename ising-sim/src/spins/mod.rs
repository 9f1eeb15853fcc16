pub mod energy;

pub use energy::{local_energy, total_energy};
