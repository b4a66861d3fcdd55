//! Macroscopic diagnostics derived from a stored population buffer.

use crate::lattice::{macroscopic, Cells};
use crate::obstacles::ObstacleMask;
use crate::params::SimParams;

/// Sum of all populations over the whole grid. Conserved from one
/// timestep to the next; used for instrumentation, not for the physics.
pub fn total_density(cells: &Cells) -> f32 {
    cells.data.iter().map(|cell| cell.iter().sum::<f32>()).sum()
}

/// Mean velocity magnitude over non-obstacle cells.
///
/// Same derivation as the step's fluid branch, but from a stored buffer;
/// independently callable so the final state can be characterized without
/// re-running a step.
pub fn mean_velocity(cells: &Cells, obstacles: &ObstacleMask) -> f32 {
    let mut tot_u = 0.0f32;
    let mut tot_cells = 0u32;

    for y in 0..cells.h {
        for x in 0..cells.w {
            if obstacles.blocked(x, y) {
                continue;
            }
            let (_, u_x, u_y) = macroscopic(&cells.get(x, y));
            tot_u += (u_x * u_x + u_y * u_y).sqrt();
            tot_cells += 1;
        }
    }

    tot_u / tot_cells as f32
}

/// Kinematic viscosity implied by the relaxation parameter:
/// `(1/6) * (2/omega - 1)`. Degenerates at omega = 2 (zero viscosity, so
/// the Reynolds number blows up); unguarded, matching the historical
/// behavior.
#[inline]
pub fn viscosity(omega: f32) -> f32 {
    1.0 / 6.0 * (2.0 / omega - 1.0)
}

/// Reynolds number of the current flow state:
/// `mean velocity * reference length / viscosity`.
pub fn reynolds_number(params: &SimParams, cells: &Cells, obstacles: &ObstacleMask) -> f32 {
    mean_velocity(cells, obstacles) * params.reynolds_dim as f32 / viscosity(params.omega)
}
