use crate::geometry::Lattice;

/// Interaction energy of cell `i` with its four neighbors:
/// `-s_i * (s_left + s_right + s_up + s_down)`.
///
/// Ferromagnetic nearest-neighbor coupling with `J = 1`, so the result is one of
/// `-4, -2, 0, 2, 4`. Flipping `s_i` changes the total energy by `-2 * local_energy`.
#[inline]
pub fn local_energy(i: usize, lattice: &Lattice) -> i32 {
    let spins = lattice.spins();
    let nb = lattice.neighbors(i);
    let h = spins[nb.left] as i32
        + spins[nb.right] as i32
        + spins[nb.up] as i32
        + spins[nb.down] as i32;
    -(spins[i] as i32) * h
}

/// Total bond energy `H = -sum_<ij> s_i s_j`, each bond counted once.
///
/// Only the forward (right, down) bond of every cell is visited, which makes this
/// exactly half of the sum of [`local_energy`] over all cells.
pub fn total_energy(lattice: &Lattice) -> i64 {
    let spins = lattice.spins();
    let mut total = 0i64;
    for i in 0..lattice.n_spins() {
        let nb = lattice.neighbors(i);
        let si = spins[i] as i64;
        total -= si * (spins[nb.right] as i64 + spins[nb.down] as i64);
    }
    total
}
