pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod lattice;
pub mod obstacles;
pub mod output;
pub mod params;
pub mod render;
pub mod solver;

use std::time::Instant;

pub use error::Error;
use lattice::Cells;
use obstacles::ObstacleMask;
use params::SimParams;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Everything a run produces: the final population buffer plus the
/// per-timestep mean-velocity history.
pub struct SimOutput {
    pub cells: Cells,
    pub av_vels: Vec<f32>,
}

/// Run the full bounded iteration: allocate both population buffers at
/// the rest-state equilibrium, then for each timestep accelerate the
/// forcing row, advance one step into the scratch buffer, and swap the
/// buffer roles. Buffers are allocated once; only their roles rotate.
pub fn simulate(params: &SimParams, obstacles: &ObstacleMask) -> (SimOutput, Vec<Timing>) {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    let t = Instant::now();
    let mut cells = lattice::rest_state(params.nx, params.ny, params.density);
    let mut scratch = cells.clone();
    let mut av_vels = Vec::with_capacity(params.max_iters);
    timings.push(Timing {
        name: "init",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    let t = Instant::now();
    for _ in 0..params.max_iters {
        solver::accelerate_flow(&mut cells, obstacles, params);
        let av = solver::step(&cells, &mut scratch, obstacles, params.omega);
        av_vels.push(av);
        std::mem::swap(&mut cells, &mut scratch);
    }
    timings.push(Timing {
        name: "compute",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    (SimOutput { cells, av_vels }, timings)
}
