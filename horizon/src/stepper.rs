//! Forward problem: where do you end up walking `distance` meters
//! from `origin` at `bearing`?

use crate::{math, C};
use geo::{geometry::Coord, GeodesicDestination, Point};

/// Computes destination points for ray marching.
///
/// Bearings are degrees clockwise from north; distances are meters.
/// Implementations must be pure: the same inputs always produce the
/// same destination.
pub trait Stepper {
    fn destination(&self, origin: Coord<C>, bearing_deg: C, distance_m: C) -> Coord<C>;
}

/// Geodesic on the WGS84 ellipsoid (Karney).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geodesic;

impl Stepper for Geodesic {
    fn destination(&self, origin: Coord<C>, bearing_deg: C, distance_m: C) -> Coord<C> {
        Point::from(origin)
            .geodesic_destination(bearing_deg, distance_m)
            .0
    }
}

/// Great circle on a sphere of mean earth radius.
///
/// Cheaper than [`Geodesic`] but off by up to ~0.5%.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Haversine;

impl Stepper for Haversine {
    fn destination(&self, origin: Coord<C>, bearing_deg: C, distance_m: C) -> Coord<C> {
        math::destination(origin, bearing_deg, distance_m)
    }
}
