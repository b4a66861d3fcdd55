//! Text output in the historical formats: one final-state line per cell
//! and one mean-velocity line per timestep.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::lattice::{macroscopic, Cells, C_SQ};
use crate::obstacles::ObstacleMask;
use crate::params::SimParams;

/// Write the final state, ordered by increasing y then x:
/// `x y u_x u_y |u| pressure blocked`. Obstacle cells report zero
/// velocity and the reference pressure `density / 3`.
pub fn write_final_state(
    w: &mut impl Write,
    params: &SimParams,
    cells: &Cells,
    obstacles: &ObstacleMask,
) -> io::Result<()> {
    for y in 0..params.ny {
        for x in 0..params.nx {
            let blocked = obstacles.blocked(x, y);
            let (u_x, u_y, u, pressure) = if blocked {
                (0.0, 0.0, 0.0, params.density * C_SQ)
            } else {
                let (rho, u_x, u_y) = macroscopic(&cells.get(x, y));
                let u = (u_x * u_x + u_y * u_y).sqrt();
                (u_x, u_y, u, rho * C_SQ)
            };
            writeln!(
                w,
                "{} {} {:.12E} {:.12E} {:.12E} {:.12E} {}",
                x, y, u_x, u_y, u, pressure, blocked as i32
            )?;
        }
    }
    Ok(())
}

/// Write the per-timestep mean-velocity history: `t:\t<mean>`.
pub fn write_av_vels(w: &mut impl Write, av_vels: &[f32]) -> io::Result<()> {
    for (t, v) in av_vels.iter().enumerate() {
        writeln!(w, "{}:\t{:.12E}", t, v)?;
    }
    Ok(())
}

/// Write the final state to a file.
pub fn save_final_state(
    path: impl AsRef<Path>,
    params: &SimParams,
    cells: &Cells,
    obstacles: &ObstacleMask,
) -> Result<(), Error> {
    let path = path.as_ref();
    let open = |e| Error::io("write final state file", path, e);
    let mut w = BufWriter::new(File::create(path).map_err(open)?);
    write_final_state(&mut w, params, cells, obstacles).map_err(open)?;
    w.flush().map_err(open)
}

/// Write the mean-velocity history to a file.
pub fn save_av_vels(path: impl AsRef<Path>, av_vels: &[f32]) -> Result<(), Error> {
    let path = path.as_ref();
    let open = |e| Error::io("write velocity history file", path, e);
    let mut w = BufWriter::new(File::create(path).map_err(open)?);
    write_av_vels(&mut w, av_vels).map_err(open)?;
    w.flush().map_err(open)
}
