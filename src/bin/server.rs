use std::net::SocketAddr;

use axum::{Json, Router, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use lbm2d::diagnostics;
use lbm2d::obstacles::ObstacleMask;
use lbm2d::params::SimParams;
use lbm2d::render;

#[derive(Deserialize)]
struct SimulateRequest {
    nx: Option<usize>,
    ny: Option<usize>,
    max_iters: Option<usize>,
    reynolds_dim: Option<usize>,
    density: Option<f32>,
    accel: Option<f32>,
    omega: Option<f32>,
    /// Blocked cells as [x, y] pairs.
    obstacles: Option<Vec<[usize; 2]>>,
}

#[derive(Serialize)]
struct SimulateResponse {
    layers: Vec<Layer>,
    av_vels: Vec<f32>,
    reynolds: f32,
    timings: Vec<TimingEntry>,
    nx: usize,
    ny: usize,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> String {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .expect("PNG encode failed");
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    format!("data:image/png;base64,{}", b64)
}

async fn simulate_handler(
    Json(req): Json<SimulateRequest>,
) -> Result<Json<SimulateResponse>, Json<ErrorResponse>> {
    let defaults = SimParams::default();
    let params = SimParams {
        nx: req.nx.unwrap_or(defaults.nx),
        ny: req.ny.unwrap_or(defaults.ny),
        max_iters: req.max_iters.unwrap_or(defaults.max_iters),
        reynolds_dim: req.reynolds_dim.unwrap_or(defaults.reynolds_dim),
        density: req.density.unwrap_or(defaults.density),
        accel: req.accel.unwrap_or(defaults.accel),
        omega: req.omega.unwrap_or(defaults.omega),
    };

    let blocked = req.obstacles.unwrap_or_default();
    for &[x, y] in &blocked {
        if x >= params.nx || y >= params.ny {
            return Err(Json(ErrorResponse {
                error: format!("obstacle ({}, {}) outside {}x{} grid", x, y, params.nx, params.ny),
            }));
        }
    }

    let response = tokio::task::spawn_blocking(move || {
        let pairs: Vec<(usize, usize)> = blocked.iter().map(|&[x, y]| (x, y)).collect();
        let obstacles = ObstacleMask::from_blocked(params.nx, params.ny, &pairs);

        let (out, timings) = lbm2d::simulate(&params, &obstacles);

        let layers = vec![
            Layer {
                name: "speed".into(),
                data_url: encode_png(
                    &render::render_speed(&out.cells, &obstacles),
                    params.nx,
                    params.ny,
                ),
            },
            Layer {
                name: "density".into(),
                data_url: encode_png(
                    &render::render_density(&out.cells, &obstacles),
                    params.nx,
                    params.ny,
                ),
            },
        ];

        let timing_entries = timings
            .iter()
            .map(|t| TimingEntry {
                name: t.name.to_string(),
                ms: t.ms,
            })
            .collect();

        SimulateResponse {
            layers,
            reynolds: diagnostics::reynolds_number(&params, &out.cells, &obstacles),
            av_vels: out.av_vels,
            timings: timing_entries,
            nx: params.nx,
            ny: params.ny,
        }
    })
    .await
    .unwrap();

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/simulate", post(simulate_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    eprintln!("lbm2d server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
