use crate::{
    math::elevation_angle,
    stepper::{Geodesic, Stepper},
    ElevationGrid, HorizonError, ProfileParams, C,
};
use geo::geometry::Coord;
use log::debug;

/// Running maximum before any terrain has been seen.
pub const NO_HORIZON_DEG: C = -90.0;

/// Apparent horizon along one bearing.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizonProfile {
    /// Degrees clockwise from north.
    pub bearing: C,

    /// Observer ground elevation plus observer height (meters).
    pub observer_elev_m: C,

    /// Distance from the observer of each step (meters).
    pub distances_m: Vec<C>,

    /// Highest elevation angle seen at or before each step
    /// (degrees). Never decreases.
    pub angles_deg: Vec<C>,

    /// Number of steps that landed on usable terrain.
    pub samples_used: usize,
}

impl HorizonProfile {
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.angles_deg.len()
    }

    /// Returns the horizon angle for the whole ray.
    pub fn max_angle(&self) -> C {
        self.angles_deg.last().copied().unwrap_or(NO_HORIZON_DEG)
    }

    /// Returns (distance, angle) pairs, nearest first.
    pub fn iter(&self) -> impl Iterator<Item = (C, C)> + '_ {
        self.distances_m
            .iter()
            .copied()
            .zip(self.angles_deg.iter().copied())
    }
}

/// Horizon calculator.
///
/// Holds the [`Stepper`] used to walk rays; everything else is
/// supplied per query.
#[derive(Debug, Clone, Default)]
pub struct Horizon<S = Geodesic> {
    stepper: S,
}

impl<S: Stepper> Horizon<S> {
    pub fn new(stepper: S) -> Self {
        Self { stepper }
    }

    pub fn stepper(&self) -> &S {
        &self.stepper
    }

    /// Returns the horizon profile seen from `observer` looking
    /// along `bearing_deg`.
    ///
    /// Fails only when the observer itself can't be placed on the
    /// grid. Steps which land outside the grid, or on missing
    /// samples, leave the horizon unchanged.
    pub fn profile(
        &self,
        grid: &ElevationGrid,
        observer: Coord<C>,
        bearing_deg: C,
        params: &ProfileParams,
    ) -> Result<HorizonProfile, HorizonError> {
        if !bearing_deg.is_finite() {
            return Err(HorizonError::InvalidParam {
                name: "bearing",
                value: bearing_deg,
            });
        }
        let observer_elev_m = observer_elevation(grid, observer)? + params.observer_height_m();
        Ok(self.march(grid, observer, observer_elev_m, bearing_deg, params))
    }

    fn march(
        &self,
        grid: &ElevationGrid,
        observer: Coord<C>,
        observer_elev_m: C,
        bearing_deg: C,
        params: &ProfileParams,
    ) -> HorizonProfile {
        let now = std::time::Instant::now();
        let mut distances_m = Vec::with_capacity(params.step_count());
        let mut angles_deg = Vec::with_capacity(params.step_count());
        let mut samples_used = 0;
        let mut horizon = NO_HORIZON_DEG;

        for distance_m in params.distances() {
            let dest = self.stepper.destination(observer, bearing_deg, distance_m);
            let terrain_elev_m = if grid.contains(dest) {
                grid.sample(dest).ok()
            } else {
                None
            };
            // No terrain here: nothing can raise the horizon.
            if let Some(terrain_elev_m) = terrain_elev_m {
                horizon = horizon.max(elevation_angle(observer_elev_m, distance_m, terrain_elev_m));
                samples_used += 1;
            }
            distances_m.push(distance_m);
            angles_deg.push(horizon);
        }

        debug!(
            "profile; bearing: {bearing_deg}, len: {}, samples_used: {samples_used}, exec: {:?}",
            angles_deg.len(),
            now.elapsed()
        );

        HorizonProfile {
            bearing: bearing_deg,
            observer_elev_m,
            distances_m,
            angles_deg,
            samples_used,
        }
    }
}

/// Returns the ground elevation under `observer`.
pub(crate) fn observer_elevation(
    grid: &ElevationGrid,
    observer: Coord<C>,
) -> Result<C, HorizonError> {
    if !(observer.x.is_finite() && (-180.0..=180.0).contains(&observer.x)) {
        return Err(HorizonError::InvalidParam {
            name: "longitude",
            value: observer.x,
        });
    }
    if !(observer.y.is_finite() && (-90.0..=90.0).contains(&observer.y)) {
        return Err(HorizonError::InvalidParam {
            name: "latitude",
            value: observer.y,
        });
    }
    if !grid.contains(observer) {
        return Err(HorizonError::ObserverOutOfRange { point: observer });
    }
    grid.sample(observer)
        .map_err(|reason| HorizonError::ObserverElevationUnavailable {
            point: observer,
            reason: Box::new(reason),
        })
}

#[cfg(test)]
mod tests {
    use super::{Horizon, HorizonProfile, NO_HORIZON_DEG};
    use crate::{
        fixtures::{flat_grid, raised_corner_grid, rugged_grid, CountingStepper, OBSERVER},
        ElevationGrid, GeoTransform, Geodesic, Haversine, HorizonError, ProfileParams, Stepper,
    };
    use approx::assert_relative_eq;
    use geo::geometry::Coord;

    fn params(step_count: usize, max_distance_m: f64) -> ProfileParams {
        ProfileParams::builder()
            .step_count(step_count)
            .max_distance(max_distance_m)
            .build()
            .unwrap()
    }

    fn assert_monotonic(profile: &HorizonProfile) {
        for pair in profile.angles_deg.windows(2) {
            assert!(pair[0] <= pair[1], "{pair:?} in {profile:?}");
        }
    }

    #[test]
    fn test_flat_terrain_is_level() {
        let grid = flat_grid();
        let horizon = Horizon::new(Geodesic);
        for bearing in [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0, 359.0] {
            let profile = horizon
                .profile(&grid, OBSERVER, bearing, &params(10, 150.0))
                .unwrap();
            assert_eq!(profile.len(), 10);
            assert_relative_eq!(profile.observer_elev_m, 100.0);
            for angle in &profile.angles_deg {
                assert!(angle.abs() <= 1e-9, "bearing {bearing}: {profile:?}");
            }
        }
    }

    #[test]
    fn test_raised_corner() {
        let grid = raised_corner_grid();
        let profile = Horizon::new(Geodesic)
            .profile(&grid, OBSERVER, 315.0, &params(5, 300.0))
            .unwrap();
        assert_eq!(profile.distances_m, vec![100.0, 150.0, 200.0, 250.0, 300.0]);
        let expected = 400.0_f64.atan2(100.0).to_degrees();
        assert_relative_eq!(profile.angles_deg[0], expected, epsilon = 1e-9);
        for angle in &profile.angles_deg {
            assert!(*angle >= expected - 1e-9);
        }
        assert_monotonic(&profile);
    }

    #[test]
    fn test_constant_once_ray_leaves_grid() {
        let grid = raised_corner_grid();
        let profile = Horizon::new(Geodesic)
            .profile(&grid, OBSERVER, 315.0, &params(50, 10_000.0))
            .unwrap();
        assert_eq!(profile.len(), 50);
        assert_eq!(profile.samples_used, 1);
        let first = profile.angles_deg[0];
        assert_relative_eq!(first, 400.0_f64.atan2(100.0).to_degrees(), epsilon = 1e-9);
        assert!(profile.angles_deg.iter().all(|angle| *angle == first));
    }

    #[test]
    fn test_no_coverage_keeps_sentinel() {
        let grid = flat_grid();
        let params = ProfileParams::builder()
            .step_count(3)
            .min_distance(1_000.0)
            .max_distance(2_000.0)
            .build()
            .unwrap();
        let profile = Horizon::new(Geodesic)
            .profile(&grid, OBSERVER, 10.0, &params)
            .unwrap();
        assert_eq!(profile.samples_used, 0);
        assert_eq!(profile.angles_deg, vec![NO_HORIZON_DEG; 3]);
        assert_eq!(profile.max_angle(), NO_HORIZON_DEG);
    }

    #[test]
    fn test_observer_height_lowers_horizon() {
        let grid = flat_grid();
        let params = ProfileParams::builder()
            .step_count(1)
            .max_distance(100.0)
            .observer_height(100.0)
            .build()
            .unwrap();
        let profile = Horizon::new(Geodesic)
            .profile(&grid, OBSERVER, 180.0, &params)
            .unwrap();
        assert_relative_eq!(profile.observer_elev_m, 200.0);
        assert_relative_eq!(profile.max_angle(), -45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rugged_profiles_are_monotonic() {
        let grid = rugged_grid();
        let observer = Coord { x: 0.032, y: -0.032 };
        let horizon = Horizon::new(Geodesic);
        let params = params(400, 5_000.0);
        for bearing in (0..360).step_by(15) {
            let profile = horizon
                .profile(&grid, observer, f64::from(bearing), &params)
                .unwrap();
            assert_eq!(profile.len(), 400);
            assert_eq!(profile.iter().count(), 400);
            assert!(profile.samples_used > 0);
            assert_monotonic(&profile);
        }
    }

    #[test]
    fn test_profile_is_idempotent() {
        let grid = rugged_grid();
        let observer = Coord { x: 0.0201, y: -0.0402 };
        let params = params(250, 4_000.0);
        let geodesic = Horizon::new(Geodesic);
        let a = geodesic.profile(&grid, observer, 77.0, &params).unwrap();
        let b = geodesic.profile(&grid, observer, 77.0, &params).unwrap();
        assert_eq!(a, b);
        let haversine = Horizon::new(Haversine);
        let a = haversine.profile(&grid, observer, 77.0, &params).unwrap();
        let b = haversine.profile(&grid, observer, 77.0, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_observer_out_of_range_never_steps() {
        let grid = flat_grid();
        let horizon = Horizon::new(CountingStepper::default());
        let observer = Coord { x: 0.01, y: -0.001 };
        assert_eq!(
            horizon.profile(&grid, observer, 90.0, &params(10, 1_000.0)),
            Err(HorizonError::ObserverOutOfRange { point: observer })
        );
        assert_eq!(horizon.stepper().calls(), 0);

        // Sanity check the counter itself.
        horizon
            .profile(&grid, OBSERVER, 90.0, &params(10, 1_000.0))
            .unwrap();
        assert_eq!(horizon.stepper().calls(), 10);
    }

    #[test]
    fn test_observer_elevation_unavailable() {
        // Quarter degree pixels keep the far edge exact.
        let grid = ElevationGrid::new(
            vec![1.0; 4],
            2,
            2,
            GeoTransform::new(Coord { x: 0.0, y: 0.0 }, 0.25, -0.25),
        )
        .unwrap();
        let observer = Coord { x: 0.5, y: -0.5 };
        let horizon = Horizon::new(CountingStepper::default());
        assert_eq!(
            horizon.profile(&grid, observer, 0.0, &params(10, 1_000.0)),
            Err(HorizonError::ObserverElevationUnavailable {
                point: observer,
                reason: Box::new(HorizonError::OutOfBounds {
                    point: observer,
                    row: 2,
                    col: 2,
                }),
            })
        );
        assert_eq!(horizon.stepper().calls(), 0);
    }

    /// Heads due east, one quarter degree per 100 m.
    struct QuarterDegreeEast;

    impl Stepper for QuarterDegreeEast {
        fn destination(&self, origin: Coord, _bearing_deg: f64, distance_m: f64) -> Coord {
            Coord {
                x: origin.x + distance_m / 400.0,
                y: origin.y,
            }
        }
    }

    #[test]
    fn test_unsampleable_steps_inside_bounds_keep_max() {
        let void = -32768.0;
        let grid = ElevationGrid::new(
            vec![100.0, 300.0, void, 50.0, 100.0],
            1,
            5,
            GeoTransform::new(Coord { x: 0.0, y: 0.0 }, 0.25, -0.25),
        )
        .unwrap()
        .with_nodata(void);
        let observer = Coord { x: 0.0, y: -0.125 };

        // Steps at 200 m (void) and 500 m (far edge) are inside the
        // bounds but can't be sampled.
        let void_step = Coord { x: 0.5, y: -0.125 };
        let far_edge = Coord { x: 1.25, y: -0.125 };
        assert!(grid.contains(void_step));
        assert_eq!(
            grid.sample(void_step),
            Err(HorizonError::NoData { point: void_step })
        );
        assert!(grid.contains(far_edge));
        assert!(matches!(
            grid.sample(far_edge),
            Err(HorizonError::OutOfBounds { col: 5, row: 0, .. })
        ));

        let params = ProfileParams::builder()
            .step_count(6)
            .min_distance(100.0)
            .max_distance(600.0)
            .build()
            .unwrap();
        let profile = Horizon::new(QuarterDegreeEast)
            .profile(&grid, observer, 90.0, &params)
            .unwrap();
        assert_eq!(profile.len(), 6);
        assert_eq!(
            profile.distances_m,
            vec![100.0, 200.0, 300.0, 400.0, 500.0, 600.0]
        );
        // Pixels 1, 3 and 4; not the void, the far edge or beyond.
        assert_eq!(profile.samples_used, 3);
        let tallest = 200.0_f64.atan2(100.0).to_degrees();
        for angle in &profile.angles_deg {
            assert_relative_eq!(*angle, tallest, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_observer_on_void() {
        let mut samples = vec![100.0; 9];
        samples[4] = -32768.0;
        let grid = ElevationGrid::new(
            samples,
            3,
            3,
            GeoTransform::new(Coord { x: 0.0, y: 0.0 }, 0.001, -0.001),
        )
        .unwrap()
        .with_nodata(-32768.0);
        let observer = Coord {
            x: 0.0015,
            y: -0.0015,
        };
        assert!(matches!(
            Horizon::new(Geodesic).profile(&grid, observer, 0.0, &params(10, 1_000.0)),
            Err(HorizonError::ObserverElevationUnavailable { reason, .. })
                if *reason == HorizonError::NoData { point: observer }
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let grid = flat_grid();
        let horizon = Horizon::new(Geodesic);
        assert!(matches!(
            horizon.profile(&grid, OBSERVER, f64::NAN, &params(10, 1_000.0)),
            Err(HorizonError::InvalidParam { name: "bearing", .. })
        ));
        assert!(matches!(
            horizon.profile(&grid, Coord { x: 0.0, y: 91.0 }, 0.0, &params(10, 1_000.0)),
            Err(HorizonError::InvalidParam { name: "latitude", .. })
        ));
        assert!(matches!(
            horizon.profile(&grid, Coord { x: -181.0, y: 0.0 }, 0.0, &params(10, 1_000.0)),
            Err(HorizonError::InvalidParam { name: "longitude", .. })
        ));
    }
}
