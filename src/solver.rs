//! The per-timestep update engine: forcing-row acceleration plus the fused
//! propagate / bounce-back / collide pass.

use rayon::prelude::*;

use crate::grid::{east, north, south, west};
use crate::lattice::{Cell, Cells, C_SQ_INV, NSPEEDS, OPPOSITE, W};
use crate::obstacles::ObstacleMask;
use crate::params::SimParams;

/// Redistribute density toward the east in the forcing row (`ny - 2`),
/// in place on the current buffer, before propagation.
///
/// Adds `density * accel / 9` to the east axis direction (1) and
/// `density * accel / 36` to the east diagonals (5, 8), subtracting the
/// same amounts from the west-side directions (3, 6, 7). Mass at the cell
/// is unchanged. Columns where the subtraction would drive a west-side
/// population non-positive are skipped silently, as are obstacle columns.
pub fn accelerate_flow(cells: &mut Cells, obstacles: &ObstacleMask, params: &SimParams) {
    let aw1 = params.density * params.accel / 9.0;
    let aw2 = params.density * params.accel / 36.0;

    let y = params.ny - 2;
    for x in 0..params.nx {
        let i = cells.idx(x, y);
        let cell = &mut cells.data[i];
        if !obstacles.blocked(x, y)
            && cell[3] - aw1 > 0.0
            && cell[6] - aw2 > 0.0
            && cell[7] - aw2 > 0.0
        {
            cell[1] += aw1;
            cell[5] += aw2;
            cell[8] += aw2;
            cell[3] -= aw1;
            cell[6] -= aw2;
            cell[7] -= aw2;
        }
    }
}

/// Populations that streamed into (x, y) this step: direction d is pulled
/// from the neighbor at (x, y) - e_d, with toroidal wrap on both axes.
#[inline]
fn gather(current: &Cells, x: usize, y: usize) -> Cell {
    let nx = current.w;
    let ny = current.h;
    let x_e = east(x, nx);
    let x_w = west(x, nx);
    let y_n = north(y, ny);
    let y_s = south(y, ny);

    [
        current.get(x, y)[0],
        current.get(x_w, y)[1],
        current.get(x, y_s)[2],
        current.get(x_e, y)[3],
        current.get(x, y_n)[4],
        current.get(x_w, y_s)[5],
        current.get(x_e, y_s)[6],
        current.get(x_e, y_n)[7],
        current.get(x_w, y_n)[8],
    ]
}

/// Advance the population field by one timestep: gather (propagation with
/// periodic wrap), then full bounce-back at obstacle cells or BGK
/// relaxation toward equilibrium at fluid cells. Reads `current` only,
/// writes `scratch` only; the caller swaps buffer roles afterwards.
///
/// Returns the mean velocity magnitude over fluid cells. With zero fluid
/// cells this divides 0/0 and yields NaN; preserved, not guarded.
///
/// Cells are updated in parallel, one rayon task per grid row; each row
/// contributes a partial (|u| sum, fluid-cell count) pair and the partials
/// are combined with `reduce`, so the summation order follows rayon's join
/// tree rather than any fixed sequential order. The mean is therefore not
/// bit-exact across runs with different thread counts.
pub fn step(current: &Cells, scratch: &mut Cells, obstacles: &ObstacleMask, omega: f32) -> f32 {
    let nx = current.w;

    let (tot_u, tot_cells) = scratch
        .data
        .par_chunks_mut(nx)
        .enumerate()
        .map(|(y, row)| {
            let mut tot_u = 0.0f32;
            let mut tot_cells = 0u32;

            for (x, out) in row.iter_mut().enumerate() {
                let s = gather(current, x, y);

                if obstacles.blocked(x, y) {
                    // Full reflection: each direction takes its opposite
                    // pair's gathered value. The rest population (0) is
                    // left untouched; no collision at solid cells.
                    for d in 1..NSPEEDS {
                        out[d] = s[OPPOSITE[d]];
                    }
                } else {
                    let rho: f32 = s.iter().sum();
                    let u_x = (s[1] + s[5] + s[8] - (s[3] + s[6] + s[7])) / rho;
                    let u_y = (s[2] + s[5] + s[6] - (s[4] + s[7] + s[8])) / rho;
                    let u_sq = u_x * u_x + u_y * u_y;

                    // Projected velocity e·u per direction.
                    let eu = [
                        0.0,
                        u_x,
                        u_y,
                        -u_x,
                        -u_y,
                        u_x + u_y,
                        -u_x + u_y,
                        -u_x - u_y,
                        u_x - u_y,
                    ];

                    for d in 0..NSPEEDS {
                        let eq = W[d]
                            * rho
                            * (1.0 + eu[d] * C_SQ_INV
                                + eu[d] * eu[d] * (0.5 * C_SQ_INV * C_SQ_INV)
                                - u_sq * (0.5 * C_SQ_INV));
                        out[d] = s[d] + omega * (eq - s[d]);
                    }

                    tot_u += u_sq.sqrt();
                    tot_cells += 1;
                }
            }

            (tot_u, tot_cells)
        })
        .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    tot_u / tot_cells as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::total_density;
    use crate::grid::Grid;
    use crate::lattice::rest_state;

    fn params(nx: usize, ny: usize, density: f32, accel: f32, omega: f32) -> SimParams {
        SimParams {
            nx,
            ny,
            max_iters: 0,
            reynolds_dim: nx,
            density,
            accel,
            omega,
        }
    }

    /// Distinct, positive population values so streams are traceable.
    fn marked_cells(nx: usize, ny: usize) -> Cells {
        let mut cells: Cells = Grid::new(nx, ny);
        for y in 0..ny {
            for x in 0..nx {
                let cell: Cell =
                    std::array::from_fn(|d| 1.0 + 0.01 * (x + 10 * y + 100 * d) as f32);
                cells.set(x, y, cell);
            }
        }
        cells
    }

    #[test]
    fn uniform_rest_state_is_a_fixed_point() {
        // 2x2, density 0.1, omega 1.0, no obstacles, no forcing: one step
        // must reproduce the initial equilibrium weights at every cell.
        let initial = rest_state(2, 2, 0.1);
        let current = initial.clone();
        let mut scratch: Cells = Grid::new(2, 2);
        let obstacles = ObstacleMask::open(2, 2);

        let mean = step(&current, &mut scratch, &obstacles, 1.0);

        assert_eq!(mean, 0.0, "rest state must report zero mean velocity");
        for (got, want) in scratch.data.iter().zip(initial.data.iter()) {
            for d in 0..NSPEEDS {
                assert!(
                    (got[d] - want[d]).abs() < 1e-7,
                    "direction {}: {} vs {}",
                    d,
                    got[d],
                    want[d]
                );
            }
        }
    }

    #[test]
    fn mass_is_conserved_across_steps() {
        let p = params(8, 6, 0.1, 0.005, 1.6);
        let obstacles = ObstacleMask::from_blocked(8, 6, &[(3, 2), (4, 2)]);
        let mut current = rest_state(8, 6, 0.1);
        let mut scratch = current.clone();

        let before = total_density(&current);
        for _ in 0..50 {
            accelerate_flow(&mut current, &obstacles, &p);
            step(&current, &mut scratch, &obstacles, p.omega);
            std::mem::swap(&mut current, &mut scratch);
        }
        let after = total_density(&current);

        assert!(
            ((after - before) / before).abs() < 1e-4,
            "total density drifted: {} -> {}",
            before,
            after
        );
    }

    #[test]
    fn zero_accel_no_obstacles_is_idempotent() {
        let obstacles = ObstacleMask::open(5, 4);
        let mut current = rest_state(5, 4, 0.1);
        let mut scratch = current.clone();
        let before = total_density(&current);

        for _ in 0..20 {
            let mean = step(&current, &mut scratch, &obstacles, 1.9);
            assert_eq!(mean, 0.0);
            std::mem::swap(&mut current, &mut scratch);
        }

        let after = total_density(&current);
        assert!(((after - before) / before).abs() < 1e-5);
    }

    #[test]
    fn obstacle_cells_reflect_gathered_opposites() {
        let current = marked_cells(3, 3);
        let mut scratch: Cells = Grid::new(3, 3);
        let obstacles = ObstacleMask::from_blocked(3, 3, &[(1, 1)]);

        step(&current, &mut scratch, &obstacles, 1.5);

        let gathered = gather(&current, 1, 1);
        let got = scratch.get(1, 1);
        for d in 1..NSPEEDS {
            assert_eq!(
                got[d],
                gathered[OPPOSITE[d]],
                "direction {} must be the exact opposite-pair gathered value",
                d
            );
        }
    }

    #[test]
    fn obstacle_rest_population_is_untouched() {
        let current = marked_cells(3, 3);
        let mut scratch: Cells = Grid::new(3, 3);
        let sentinel = 42.0;
        let i = scratch.idx(1, 1);
        scratch.data[i][0] = sentinel;
        let obstacles = ObstacleMask::from_blocked(3, 3, &[(1, 1)]);

        step(&current, &mut scratch, &obstacles, 1.5);

        assert_eq!(scratch.get(1, 1)[0], sentinel);
    }

    #[test]
    fn edge_cells_gather_from_wrapped_neighbors() {
        // omega = 0 disables relaxation, so the scratch buffer holds the
        // pure gathered values and a marker is traceable across the wrap.
        let mut current = rest_state(3, 2, 0.1);
        let marker = 0.25;
        let i = current.idx(2, 0);
        current.data[i][1] += marker;
        let mut scratch: Cells = Grid::new(3, 2);
        let obstacles = ObstacleMask::open(3, 2);

        step(&current, &mut scratch, &obstacles, 0.0);

        // The east-travelling population at the east edge lands in column 0.
        assert_eq!(scratch.get(0, 0)[1], current.get(2, 0)[1]);
        assert_eq!(scratch.get(1, 0)[1], current.get(0, 0)[1]);
    }

    #[test]
    fn all_blocked_grid_yields_nan_mean() {
        // Known degeneracy: no fluid cells divides 0/0. Documented, not
        // guarded.
        let current = rest_state(2, 2, 0.1);
        let mut scratch: Cells = Grid::new(2, 2);
        let obstacles = ObstacleMask::from_blocked(2, 2, &[(0, 0), (1, 0), (0, 1), (1, 1)]);

        let mean = step(&current, &mut scratch, &obstacles, 1.0);
        assert!(mean.is_nan());
    }

    #[test]
    fn accelerate_adds_east_and_subtracts_west() {
        let p = params(4, 4, 0.1, 0.005, 1.0);
        let obstacles = ObstacleMask::open(4, 4);
        let mut cells = rest_state(4, 4, 0.1);
        let before = cells.get(1, 2);
        let aw1 = p.density * p.accel / 9.0;
        let aw2 = p.density * p.accel / 36.0;

        accelerate_flow(&mut cells, &obstacles, &p);

        // Forcing row is ny - 2 = 2; other rows untouched.
        let after = cells.get(1, 2);
        assert!((after[1] - (before[1] + aw1)).abs() < 1e-9);
        assert!((after[5] - (before[5] + aw2)).abs() < 1e-9);
        assert!((after[8] - (before[8] + aw2)).abs() < 1e-9);
        assert!((after[3] - (before[3] - aw1)).abs() < 1e-9);
        assert!((after[6] - (before[6] - aw2)).abs() < 1e-9);
        assert!((after[7] - (before[7] - aw2)).abs() < 1e-9);
        assert_eq!(cells.get(1, 1), rest_state(4, 4, 0.1).get(1, 1));

        // Local redistribution only: cell mass unchanged.
        let mass_before: f32 = before.iter().sum();
        let mass_after: f32 = after.iter().sum();
        assert!((mass_after - mass_before).abs() < 1e-7);
    }

    #[test]
    fn accelerate_skips_cells_that_would_go_negative() {
        let p = params(4, 4, 0.1, 0.005, 1.0);
        let obstacles = ObstacleMask::open(4, 4);
        let mut cells = rest_state(4, 4, 0.1);
        let i = cells.idx(2, 2);
        cells.data[i][3] = 1e-9; // below the forcing increment
        let before = cells.get(2, 2);

        accelerate_flow(&mut cells, &obstacles, &p);

        assert_eq!(cells.get(2, 2), before, "guarded column must be a no-op");
        // Neighboring column still accelerates.
        assert!(cells.get(1, 2)[1] > rest_state(4, 4, 0.1).get(1, 2)[1]);
    }

    #[test]
    fn accelerate_skips_obstacle_cells() {
        let p = params(4, 4, 0.1, 0.005, 1.0);
        let obstacles = ObstacleMask::from_blocked(4, 4, &[(0, 2)]);
        let mut cells = rest_state(4, 4, 0.1);
        let before = cells.get(0, 2);

        accelerate_flow(&mut cells, &obstacles, &p);

        assert_eq!(cells.get(0, 2), before);
    }
}
