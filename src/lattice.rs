//! D2Q9 stencil: 9 discrete velocity directions on a 2D square lattice.
//!
//! Direction numbering:
//! ```text
//!   6   2   5
//!    \  |  /
//!   3 - 0 - 1
//!    /  |  \
//!   7   4   8
//! ```

use crate::grid::Grid;

pub const NSPEEDS: usize = 9;

/// The 9 population values of one lattice cell, indexed by direction.
pub type Cell = [f32; NSPEEDS];

/// Two independent population buffers alternate between the roles of
/// `current` and `scratch` every timestep (swapped by the driver).
pub type Cells = Grid<Cell>;

/// Discrete velocities: [ex, ey] per direction.
pub const E: [[i32; 2]; NSPEEDS] = [
    [0, 0],   // 0: rest
    [1, 0],   // 1: east
    [0, 1],   // 2: north
    [-1, 0],  // 3: west
    [0, -1],  // 4: south
    [1, 1],   // 5: northeast
    [-1, 1],  // 6: northwest
    [-1, -1], // 7: southwest
    [1, -1],  // 8: southeast
];

/// Lattice weights: 4/9 rest, 1/9 axes, 1/36 diagonals.
pub const W: [f32; NSPEEDS] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Opposite direction per direction, for bounce-back reflection.
pub const OPPOSITE: [usize; NSPEEDS] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Square of the lattice speed of sound (and its inverse).
pub const C_SQ: f32 = 1.0 / 3.0;
pub const C_SQ_INV: f32 = 3.0;

/// Second-order BGK equilibrium distribution for one direction:
/// `w_i * rho * (1 + 3(e·u) + 9/2(e·u)^2 - 3/2|u|^2)`.
#[inline]
pub fn equilibrium(dir: usize, rho: f32, u_x: f32, u_y: f32) -> f32 {
    let eu = E[dir][0] as f32 * u_x + E[dir][1] as f32 * u_y;
    let u_sq = u_x * u_x + u_y * u_y;
    W[dir] * rho
        * (1.0 + eu * C_SQ_INV + eu * eu * (0.5 * C_SQ_INV * C_SQ_INV)
            - u_sq * (0.5 * C_SQ_INV))
}

/// Macroscopic density: sum of the 9 populations.
#[inline]
pub fn density(cell: &Cell) -> f32 {
    cell.iter().sum()
}

/// Macroscopic (rho, u_x, u_y) for one cell.
///
/// u_x is the east-leaning sum (1, 5, 8) minus the west-leaning sum
/// (3, 6, 7) over rho; u_y likewise with north (2, 5, 6) vs south
/// (4, 7, 8). Density must be strictly positive at fluid cells.
#[inline]
pub fn macroscopic(cell: &Cell) -> (f32, f32, f32) {
    let rho = density(cell);
    let u_x = (cell[1] + cell[5] + cell[8] - (cell[3] + cell[6] + cell[7])) / rho;
    let u_y = (cell[2] + cell[5] + cell[6] - (cell[4] + cell[7] + cell[8])) / rho;
    (rho, u_x, u_y)
}

/// Allocate a population buffer initialized to the zero-velocity
/// equilibrium for a uniform density: w_i * density per direction.
pub fn rest_state(nx: usize, ny: usize, density: f32) -> Cells {
    let mut cells = Grid::new(nx, ny);
    let init: Cell = std::array::from_fn(|d| W[d] * density);
    for cell in cells.data.iter_mut() {
        *cell = init;
    }
    cells
}
