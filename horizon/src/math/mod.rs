mod elevation_angle;
mod haversine;
mod linspace;

pub(crate) use {elevation_angle::elevation_angle, haversine::destination, linspace::linspace};

/// Mean earth radius in meters, as used by the [geo] crate.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;
