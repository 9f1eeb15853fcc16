pub mod lattice;
pub mod topology;

pub use lattice::Lattice;
pub use topology::{neighbors, Neighbors, Topology};
