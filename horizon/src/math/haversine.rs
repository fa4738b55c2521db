//! Spherical destination, after the [geo] crate's haversine routines,
//! specialized to plain coordinates.
//!
//! [geo](https://github.com/georust/geo/blob/main/geo/src/algorithm/haversine_destination.rs)

use super::MEAN_EARTH_RADIUS;
use geo::{Coord, CoordFloat};
use num_traits::FromPrimitive;

/// Returns the point `distance_m` from `origin` along the great
/// circle leaving it at `bearing_deg`.
pub fn destination<T>(origin: Coord<T>, bearing_deg: T, distance_m: T) -> Coord<T>
where
    T: CoordFloat + FromPrimitive,
{
    let radius = T::from(MEAN_EARTH_RADIUS).unwrap();
    let (lat1_sin, lat1_cos) = origin.y.to_radians().sin_cos();
    let (bearing_sin, bearing_cos) = bearing_deg.to_radians().sin_cos();
    let (delta_sin, delta_cos) = (distance_m / radius).sin_cos();

    let lat2 = (lat1_sin * delta_cos + lat1_cos * delta_sin * bearing_cos).asin();
    let lon2 = origin.x.to_radians()
        + (bearing_sin * delta_sin * lat1_cos).atan2(delta_cos - lat1_sin * lat2.sin());

    Coord {
        x: wrap_longitude(lon2.to_degrees()),
        y: lat2.to_degrees(),
    }
}

/// Wraps `lon` into [-180, 180).
fn wrap_longitude<T: CoordFloat + FromPrimitive>(lon: T) -> T {
    let full = T::from(360.0).unwrap();
    let half = T::from(180.0).unwrap();
    lon - full * ((lon + half) / full).floor()
}
