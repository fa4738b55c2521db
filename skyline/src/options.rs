use anyhow::{anyhow, bail, Error as AnyError};
use clap::{Parser, Subcommand, ValueEnum};
use horizon::{
    geo::geometry::Coord, DEFAULT_AZIMUTHS, DEFAULT_MAX_DISTANCE_M, DEFAULT_MIN_DISTANCE_M,
    DEFAULT_PANORAMA_STEPS, DEFAULT_PROFILE_STEPS,
};
use std::{path::PathBuf, str::FromStr};

/// Generate terrain horizon profiles and panoramas.
#[derive(Parser, Debug, Clone)]
pub struct Cli {
    /// NASADEM/SRTM elevation tile (.hgt).
    #[arg(short, long)]
    pub tile: PathBuf,

    /// Observer "lat,lon".
    #[arg(short, long)]
    pub observer: LatLon,

    /// Observer height above ground, in meters.
    #[arg(long, default_value_t = 0.0)]
    pub height: f64,

    /// Nearest distance sampled along each ray, in meters.
    #[arg(long, default_value_t = DEFAULT_MIN_DISTANCE_M)]
    pub min_distance: f64,

    /// Farthest distance sampled along each ray, in meters.
    #[arg(short, long, default_value_t = DEFAULT_MAX_DISTANCE_M)]
    pub max_distance: f64,

    /// Walk spherical great circles instead of WGS84 geodesics.
    #[arg(long, default_value_t = false)]
    pub haversine: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Clone, Debug, Copy)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon pair"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        if !(-90.0..=90.0).contains(&lat) {
            bail!("latitude must be between -90 and 90 degrees");
        }
        if !(-180.0..=180.0).contains(&lon) {
            bail!("longitude must be between -180 and 180 degrees");
        }
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

fn parse_bearing(s: &str) -> Result<f64, AnyError> {
    let bearing = f64::from_str(s)?;
    if !(0.0..=360.0).contains(&bearing) {
        bail!("bearing must be between 0 and 360 degrees");
    }
    Ok(bearing)
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Horizon angle versus distance along one bearing.
    Profile {
        /// Degrees clockwise from north.
        #[arg(short, long, value_parser = parse_bearing)]
        bearing: f64,

        /// Number of distances to sample.
        #[arg(short, long, default_value_t = DEFAULT_PROFILE_STEPS)]
        steps: usize,
    },

    /// Horizon angle in every direction.
    Panorama {
        /// Number of evenly spaced bearings.
        #[arg(short, long, default_value_t = DEFAULT_AZIMUTHS)]
        azimuths: usize,

        /// Number of distances to sample per bearing.
        #[arg(short, long, default_value_t = DEFAULT_PANORAMA_STEPS)]
        steps: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// Comma separated values.
    Csv,

    /// JSON array.
    Json,

    /// Plot to terminal.
    Plot,
}
