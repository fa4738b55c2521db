//! # Terrain horizons
//!
//! `horizon` computes how high the skyline appears from a point on a
//! digital elevation model: along a single bearing
//! ([`Horizon::profile`]) or all the way around
//! ([`Horizon::panorama`]).
//!
//! ```no_run
//! use horizon::{geo::coord, ElevationGrid, Geodesic, Horizon, ProfileParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tile = horizon::nasadem::Tile::load("N44W072.hgt")?;
//! let grid = ElevationGrid::try_from(tile)?;
//! let params = ProfileParams::builder()
//!     .step_count(1000)
//!     .max_distance(100_000.0)
//!     .build()?;
//! let profile = Horizon::new(Geodesic).profile(
//!     &grid,
//!     coord!(x: -71.30325, y: 44.2705),
//!     90.0,
//!     &params,
//! )?;
//! println!("horizon: {}°", profile.max_angle());
//! # Ok(())
//! # }
//! ```

mod error;
mod grid;
mod math;
mod panorama;
mod params;
mod profile;
mod stepper;

pub use {
    crate::{
        error::HorizonError,
        grid::{ElevationGrid, GeoTransform},
        math::MEAN_EARTH_RADIUS,
        panorama::{Panorama, Silhouette, Status, FAILED_BEARING_DEG},
        params::{
            PanoramaParams, PanoramaParamsBuilder, ProfileParams, ProfileParamsBuilder,
            DEFAULT_AZIMUTHS, DEFAULT_MAX_DISTANCE_M, DEFAULT_MIN_DISTANCE_M,
            DEFAULT_PANORAMA_STEPS, DEFAULT_PROFILE_STEPS,
        },
        profile::{Horizon, HorizonProfile, NO_HORIZON_DEG},
        stepper::{Geodesic, Haversine, Stepper},
    },
    geo, nasadem,
};

/// Floating point type used for coordinates, distances and angles.
pub type C = f64;
