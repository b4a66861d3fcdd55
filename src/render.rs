//! Diagnostic RGBA heatmaps of the macroscopic fields.

use rayon::prelude::*;

use crate::lattice::{macroscopic, Cells};
use crate::obstacles::ObstacleMask;

// Cold-to-hot speed palette; obstacles drawn as dark gray.
const SPEED_LOW: [u8; 4] = [20, 30, 70, 255];
const SPEED_MID: [u8; 4] = [40, 160, 190, 255];
const SPEED_HIGH: [u8; 4] = [250, 230, 80, 255];
const OBSTACLE: [u8; 4] = [55, 55, 55, 255];

#[inline]
fn lerp_color(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f32 + (b[0] as f32 - a[0] as f32) * t).round() as u8,
        (a[1] as f32 + (b[1] as f32 - a[1] as f32) * t).round() as u8,
        (a[2] as f32 + (b[2] as f32 - a[2] as f32) * t).round() as u8,
        255,
    ]
}

/// Render the velocity-magnitude field, normalized to the peak speed.
pub fn render_speed(cells: &Cells, obstacles: &ObstacleMask) -> Vec<u8> {
    let w = cells.w;
    let h = cells.h;

    // One pass for the normalization peak, one for the pixels.
    let mut u_max = 0.0f32;
    for y in 0..h {
        for x in 0..w {
            if obstacles.blocked(x, y) {
                continue;
            }
            let (_, u_x, u_y) = macroscopic(&cells.get(x, y));
            let u = (u_x * u_x + u_y * u_y).sqrt();
            if u > u_max {
                u_max = u;
            }
        }
    }
    let scale = if u_max > 0.0 { 1.0 / u_max } else { 0.0 };

    let mut rgba = vec![0u8; w * h * 4];
    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let color = if obstacles.blocked(x, y) {
                OBSTACLE
            } else {
                let (_, u_x, u_y) = macroscopic(&cells.get(x, y));
                let t = (u_x * u_x + u_y * u_y).sqrt() * scale;
                if t < 0.5 {
                    lerp_color(SPEED_LOW, SPEED_MID, t / 0.5)
                } else {
                    lerp_color(SPEED_MID, SPEED_HIGH, (t - 0.5) / 0.5)
                }
            };
            row[x * 4..x * 4 + 4].copy_from_slice(&color);
        }
    });

    rgba
}

/// Render the density field as grayscale, spanning min..max density.
pub fn render_density(cells: &Cells, obstacles: &ObstacleMask) -> Vec<u8> {
    let w = cells.w;
    let h = cells.h;

    let mut lo = f32::MAX;
    let mut hi = f32::MIN;
    for y in 0..h {
        for x in 0..w {
            if obstacles.blocked(x, y) {
                continue;
            }
            let rho: f32 = cells.get(x, y).iter().sum();
            lo = lo.min(rho);
            hi = hi.max(rho);
        }
    }
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut rgba = vec![0u8; w * h * 4];
    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        for x in 0..w {
            let color = if obstacles.blocked(x, y) {
                OBSTACLE
            } else {
                let rho: f32 = cells.get(x, y).iter().sum();
                let v = (((rho - lo) / span) * 255.0).round() as u8;
                [v, v, v, 255]
            };
            row[x * 4..x * 4 + 4].copy_from_slice(&color);
        }
    });

    rgba
}
