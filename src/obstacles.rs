use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::grid::Grid;

/// Static solid-cell mask: one flag per cell, same row-major indexing as
/// the population buffers. Built once at initialization, read-only after.
#[derive(Clone, Debug)]
pub struct ObstacleMask {
    grid: Grid<bool>,
}

impl ObstacleMask {
    /// An all-fluid mask.
    pub fn open(nx: usize, ny: usize) -> Self {
        Self {
            grid: Grid::new(nx, ny),
        }
    }

    /// Build a mask from a list of blocked coordinates (used by tests and
    /// the preview server).
    pub fn from_blocked(nx: usize, ny: usize, blocked: &[(usize, usize)]) -> Self {
        let mut mask = Self::open(nx, ny);
        for &(x, y) in blocked {
            mask.grid.set(x, y, true);
        }
        mask
    }

    /// Parse the obstacle list format: zero or more `x y flag` lines,
    /// flag must be 1, coordinates must lie inside the grid.
    pub fn parse(text: &str, nx: usize, ny: usize) -> Result<Self, Error> {
        let mut mask = Self::open(nx, ny);
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(Error::ObstacleFormat(
                    "expected 3 values per line".to_string(),
                ));
            }
            let x: usize = fields[0]
                .parse()
                .map_err(|_| Error::ObstacleFormat("x-coord not an integer".to_string()))?;
            let y: usize = fields[1]
                .parse()
                .map_err(|_| Error::ObstacleFormat("y-coord not an integer".to_string()))?;
            let flag: i32 = fields[2]
                .parse()
                .map_err(|_| Error::ObstacleFormat("blocked flag not an integer".to_string()))?;

            if x >= nx {
                return Err(Error::ObstacleFormat("x-coord out of range".to_string()));
            }
            if y >= ny {
                return Err(Error::ObstacleFormat("y-coord out of range".to_string()));
            }
            if flag != 1 {
                return Err(Error::ObstacleFormat(
                    "blocked value should be 1".to_string(),
                ));
            }
            mask.grid.set(x, y, true);
        }
        Ok(mask)
    }

    /// Load the mask from an obstacle file.
    pub fn load(path: impl AsRef<Path>, nx: usize, ny: usize) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io("open input obstacles file", path, e))?;
        Self::parse(&text, nx, ny)
    }

    #[inline]
    pub fn blocked(&self, x: usize, y: usize) -> bool {
        self.grid.get(x, y)
    }

    /// Number of non-obstacle cells.
    pub fn fluid_cells(&self) -> usize {
        self.grid.data.iter().filter(|&&b| !b).count()
    }
}
