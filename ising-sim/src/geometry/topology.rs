/// The four toroidal neighbors of one cell, as linear row-major indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighbors {
    pub left: usize,
    pub right: usize,
    pub up: usize,
    pub down: usize,
}

impl Neighbors {
    #[inline]
    pub fn as_array(&self) -> [usize; 4] {
        [self.left, self.right, self.up, self.down]
    }
}

/// Resolve the neighbors of cell `i` on a `rows x cols` torus.
///
/// Cells are indexed row-major (`i = row * cols + col`). Each edge wraps
/// independently: the first column connects to the last, the first row to the
/// last.
///
/// Precondition: `rows >= 3`, `cols >= 3` and `i < rows * cols`. Smaller tori
/// produce repeated neighbors; [`crate::Lattice`] refuses to build them.
#[inline]
pub fn neighbors(i: usize, rows: usize, cols: usize) -> Neighbors {
    let n = rows * cols;
    debug_assert!(i < n, "cell {i} outside {rows}x{cols} lattice");
    Neighbors {
        left: if i % cols == 0 { i + cols - 1 } else { i - 1 },
        right: if (i + 1) % cols == 0 { i + 1 - cols } else { i + 1 },
        up: if i < cols { i + n - cols } else { i - cols },
        down: if i + cols >= n { i % cols } else { i + cols },
    }
}

/// Periodic rectangular lattice geometry with a precomputed neighbor table.
///
/// The table is built once from [`neighbors`] so the update loop pays a single
/// indexed load per lookup instead of four modulo operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub rows: usize,
    pub cols: usize,
    /// Total number of cells (`rows * cols`).
    pub n_spins: usize,
    /// Layout: `table[i * 4 + d]` with `d` in (left, right, up, down) order.
    table: Vec<u32>,
}

impl Topology {
    pub fn new(rows: usize, cols: usize) -> Self {
        let n_spins = rows * cols;
        debug_assert!(n_spins <= u32::MAX as usize, "cell index overflows u32");
        let mut table = vec![0u32; n_spins * 4];
        for i in 0..n_spins {
            for (d, j) in neighbors(i, rows, cols).as_array().into_iter().enumerate() {
                table[i * 4 + d] = j as u32;
            }
        }
        Self {
            rows,
            cols,
            n_spins,
            table,
        }
    }

    /// Neighbors of `i` from the precomputed table.
    #[inline]
    pub fn neighbors(&self, i: usize) -> Neighbors {
        let row = &self.table[i * 4..i * 4 + 4];
        Neighbors {
            left: row[0] as usize,
            right: row[1] as usize,
            up: row[2] as usize,
            down: row[3] as usize,
        }
    }

    /// Checkerboard colour of `i`: `0` when `row + col` is even, `1` otherwise.
    ///
    /// Only a proper 2-colouring of the torus when both `rows` and `cols` are even.
    #[inline]
    pub fn parity(&self, i: usize) -> usize {
        (i / self.cols + i % self.cols) % 2
    }
}
