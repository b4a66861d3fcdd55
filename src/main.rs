use std::path::PathBuf;
use std::process::ExitCode;

use lbm2d::diagnostics;
use lbm2d::obstacles::ObstacleMask;
use lbm2d::params::SimParams;
use lbm2d::{output, render};

fn usage(exe: &str) {
    eprintln!("Usage: {} <paramfile> <obstaclefile>", exe);
}

fn run(paramfile: &PathBuf, obstaclefile: &PathBuf) -> Result<(), lbm2d::Error> {
    let params = SimParams::load(paramfile)?;
    let obstacles = ObstacleMask::load(obstaclefile, params.nx, params.ny)?;

    eprintln!(
        "Running {}x{} lattice for {} iterations (omega={}, accel={})",
        params.nx, params.ny, params.max_iters, params.omega, params.accel
    );

    let (out, timings) = lbm2d::simulate(&params, &obstacles);

    println!("==done==");
    println!(
        "Reynolds number:\t\t{:.12E}",
        diagnostics::reynolds_number(&params, &out.cells, &obstacles)
    );
    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:10} {:10.1} ms", t.name, t.ms);
    }

    output::save_final_state("final_state.dat", &params, &out.cells, &obstacles)?;
    output::save_av_vels("av_vels.dat", &out.av_vels)?;

    let rgba = render::render_speed(&out.cells, &obstacles);
    image::save_buffer(
        "velocity.png",
        &rgba,
        params.nx as u32,
        params.ny as u32,
        image::ColorType::Rgba8,
    )
    .map_err(|e| {
        lbm2d::Error::io(
            "write velocity image",
            "velocity.png",
            std::io::Error::other(e),
        )
    })?;

    eprintln!("Saved final_state.dat, av_vels.dat, velocity.png");
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        usage(&args[0]);
        return ExitCode::FAILURE;
    }

    let paramfile = PathBuf::from(&args[1]);
    let obstaclefile = PathBuf::from(&args[2]);

    match run(&paramfile, &obstaclefile) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
