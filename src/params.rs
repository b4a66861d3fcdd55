use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// All simulation parameters. Immutable for the lifetime of a run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimParams {
    /// Cells in the x-direction.
    pub nx: usize,
    /// Cells in the y-direction.
    pub ny: usize,
    /// Number of timesteps.
    pub max_iters: usize,
    /// Reference length for the Reynolds number.
    pub reynolds_dim: usize,
    /// Initial density per cell.
    pub density: f32,
    /// Forcing-row density redistribution magnitude.
    pub accel: f32,
    /// BGK relaxation parameter (inverse relaxation time).
    pub omega: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            nx: 128,
            ny: 128,
            max_iters: 1000,
            reynolds_dim: 128,
            density: 0.1,
            accel: 0.005,
            omega: 1.7,
        }
    }
}

impl SimParams {
    /// Parse the historical text format: seven whitespace/newline-separated
    /// values in fixed order (nx, ny, max_iters, reynolds_dim, density,
    /// accel, omega).
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut tokens = text.split_whitespace();
        let mut next = |name: &str| {
            tokens
                .next()
                .ok_or_else(|| Error::ParamFormat(name.to_string()))
        };

        let nx = parse_field(next("nx")?, "nx")?;
        let ny = parse_field(next("ny")?, "ny")?;
        let max_iters = parse_field(next("max_iters")?, "max_iters")?;
        let reynolds_dim = parse_field(next("reynolds_dim")?, "reynolds_dim")?;
        let density = parse_field(next("density")?, "density")?;
        let accel = parse_field(next("accel")?, "accel")?;
        let omega = parse_field(next("omega")?, "omega")?;

        Ok(Self {
            nx,
            ny,
            max_iters,
            reynolds_dim,
            density,
            accel,
            omega,
        })
    }

    /// Load parameters from a file in the historical text format.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io("open input parameter file", path, e))?;
        Self::parse(&text)
    }
}

fn parse_field<T: std::str::FromStr>(token: &str, name: &str) -> Result<T, Error> {
    token
        .parse()
        .map_err(|_| Error::ParamFormat(name.to_string()))
}
