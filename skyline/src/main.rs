mod options;

use anyhow::Error as AnyError;
use clap::Parser;
use horizon::{
    nasadem::Tile, ElevationGrid, Geodesic, Haversine, Horizon, HorizonProfile, Panorama,
    PanoramaParams, ProfileParams, Status, Stepper,
};
use log::{debug, info};
use options::{Cli, Command as CliCmd, Format};
use serde::Serialize;
use std::io::Write;
use textplots::{Chart, Plot, Shape};

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    env_logger::init();

    let tile = Tile::load(&cli.tile)?;
    debug!(
        "tile: {:?}, sw_corner: {:?}, resolution: {}″, min: {:?}, max: {:?}",
        cli.tile,
        tile.sw_corner(),
        tile.resolution(),
        tile.min_elevation(),
        tile.max_elevation()
    );
    let grid = ElevationGrid::try_from(tile)?;

    if cli.haversine {
        run(&cli, &grid, &Horizon::new(Haversine))
    } else {
        run(&cli, &grid, &Horizon::new(Geodesic))
    }
}

fn run<S: Stepper + Sync>(
    cli: &Cli,
    grid: &ElevationGrid,
    horizon: &Horizon<S>,
) -> Result<(), AnyError> {
    let observer = cli.observer.0;
    match cli.cmd {
        CliCmd::Profile { bearing, steps } => {
            let params = ProfileParams::builder()
                .step_count(steps)
                .min_distance(cli.min_distance)
                .max_distance(cli.max_distance)
                .observer_height(cli.height)
                .build()?;
            let profile = horizon.profile(grid, observer, bearing, &params)?;
            info!(
                "bearing: {bearing}°, horizon: {}°, samples used: {}/{}",
                profile.max_angle(),
                profile.samples_used,
                profile.len()
            );
            match cli.format {
                Format::Csv => print_profile_csv(&profile)?,
                Format::Json => print_profile_json(&profile)?,
                Format::Plot => plot_profile(&profile),
            }
        }
        CliCmd::Panorama { azimuths, steps } => {
            let params = PanoramaParams::builder()
                .azimuth_count(azimuths)
                .step_count(steps)
                .min_distance(cli.min_distance)
                .max_distance(cli.max_distance)
                .observer_height(cli.height)
                .build()?;
            let panorama = horizon.panorama(grid, observer, &params)?;
            for (azimuth, err) in panorama.failures() {
                eprintln!("bearing {azimuth}° failed: {err}");
            }
            match cli.format {
                Format::Csv => print_panorama_csv(&panorama)?,
                Format::Json => print_panorama_json(&panorama)?,
                Format::Plot => plot_panorama(&panorama),
            }
        }
    };
    Ok(())
}

fn status_str(status: &Status) -> &'static str {
    match status {
        Status::Measured => "measured",
        Status::NoCoverage => "no_coverage",
        Status::Failed(_) => "failed",
    }
}

/// # Example with gnuplot
///
/// ```sh
/// skyline --tile N44W072.hgt --observer 44.2705,-71.30325 profile --bearing 90 | tail -n +2 | tr ',' ' ' > /tmp/plot && gnuplot -p -e "plot '/tmp/plot' using 1:2 with lines"
/// ```
fn print_profile_csv(profile: &HorizonProfile) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Distance,Angle")?;
    for (distance, angle) in profile.iter() {
        writeln!(stdout, "{distance},{angle}")?;
    }
    Ok(())
}

fn print_profile_json(profile: &HorizonProfile) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        distance: f64,
        angle: f64,
    }

    let reshaped: Vec<JsonEntry> = profile
        .iter()
        .map(|(distance, angle)| JsonEntry { distance, angle })
        .collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn plot_profile(profile: &HorizonProfile) {
    let plot_data: Vec<(f32, f32)> = profile
        .iter()
        .map(|(distance, angle)| ((distance / 1000.0) as f32, angle as f32))
        .collect();
    let (xmin, xmax) = match (plot_data.first(), plot_data.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => (0.0, 1.0),
    };
    Chart::new(300, 150, xmin, xmax)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}

fn print_panorama_csv(panorama: &Panorama) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "Azimuth,Angle,Status")?;
    for silhouette in panorama {
        writeln!(
            stdout,
            "{},{},{}",
            silhouette.azimuth,
            silhouette.angle,
            status_str(&silhouette.status)
        )?;
    }
    Ok(())
}

fn print_panorama_json(panorama: &Panorama) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry {
        azimuth: f64,
        angle: f64,
        status: &'static str,
    }

    let reshaped: Vec<JsonEntry> = panorama
        .iter()
        .map(|silhouette| JsonEntry {
            azimuth: silhouette.azimuth,
            angle: silhouette.angle,
            status: status_str(&silhouette.status),
        })
        .collect();
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn plot_panorama(panorama: &Panorama) {
    let plot_data: Vec<(f32, f32)> = panorama
        .iter()
        .filter(|silhouette| silhouette.is_measured())
        .map(|silhouette| (silhouette.azimuth as f32, silhouette.angle as f32))
        .collect();
    Chart::new(300, 150, 0.0, 360.0)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}
