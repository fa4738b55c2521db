//! Full circle horizon silhouettes.

use crate::{
    profile::observer_elevation, ElevationGrid, Horizon, HorizonError, HorizonProfile,
    PanoramaParams, Stepper, C,
};
use geo::geometry::Coord;
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Angle reported for a bearing whose profile failed.
pub const FAILED_BEARING_DEG: C = 0.0;

/// How a bearing's angle came to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// Derived from at least one terrain sample.
    Measured,

    /// The ray never crossed usable terrain; the angle is
    /// [`crate::NO_HORIZON_DEG`].
    NoCoverage,

    /// The profile failed; the angle is [`FAILED_BEARING_DEG`].
    Failed(HorizonError),
}

/// Horizon angle in one direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Silhouette {
    /// Degrees clockwise from north.
    pub azimuth: C,

    /// Degrees above (or below) the observer's horizontal.
    pub angle: C,

    pub status: Status,
}

impl Silhouette {
    /// Reduces a bearing's profile result to its silhouette.
    fn from_profile(azimuth: C, profile: Result<HorizonProfile, HorizonError>) -> Self {
        match profile {
            Ok(profile) if profile.samples_used > 0 => Self {
                azimuth,
                angle: profile.max_angle(),
                status: Status::Measured,
            },
            Ok(profile) => Self {
                azimuth,
                angle: profile.max_angle(),
                status: Status::NoCoverage,
            },
            Err(err) => {
                warn!("bearing {azimuth}°: {err}, defaulting to {FAILED_BEARING_DEG}°");
                Self {
                    azimuth,
                    angle: FAILED_BEARING_DEG,
                    status: Status::Failed(err),
                }
            }
        }
    }

    pub fn is_measured(&self) -> bool {
        self.status == Status::Measured
    }
}

/// Horizon silhouette around an observer, ordered by azimuth.
#[derive(Debug, Clone, PartialEq)]
pub struct Panorama {
    pub observer: Coord<C>,

    /// Observer ground elevation plus observer height (meters).
    pub observer_elev_m: C,

    pub silhouette: Vec<Silhouette>,
}

impl Panorama {
    pub fn len(&self) -> usize {
        self.silhouette.len()
    }

    pub fn is_empty(&self) -> bool {
        self.silhouette.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Silhouette> {
        self.silhouette.iter()
    }

    /// Returns the highest measured angle, if any bearing was
    /// measured.
    pub fn max_angle(&self) -> Option<C> {
        self.iter()
            .filter(|s| s.is_measured())
            .map(|s| s.angle)
            .reduce(C::max)
    }

    /// Returns the bearings whose profiles failed.
    pub fn failures(&self) -> impl Iterator<Item = (C, &HorizonError)> + '_ {
        self.iter().filter_map(|s| match &s.status {
            Status::Failed(err) => Some((s.azimuth, err)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a Panorama {
    type Item = &'a Silhouette;
    type IntoIter = std::slice::Iter<'a, Silhouette>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Stepper + Sync> Horizon<S> {
    /// Returns the horizon silhouette seen from `observer` in every
    /// direction.
    ///
    /// The observer is validated once up front. Bearings are
    /// computed in parallel; a bearing that fails is reported as
    /// [`Status::Failed`] instead of failing the sweep.
    pub fn panorama(
        &self,
        grid: &ElevationGrid,
        observer: Coord<C>,
        params: &PanoramaParams,
    ) -> Result<Panorama, HorizonError> {
        self.sweep(grid, observer, params, None)
    }

    /// Like [`Self::panorama`], but gives up with
    /// [`HorizonError::Cancelled`] once `cancel` is set.
    ///
    /// The flag is checked before each bearing.
    pub fn panorama_with_cancel(
        &self,
        grid: &ElevationGrid,
        observer: Coord<C>,
        params: &PanoramaParams,
        cancel: &AtomicBool,
    ) -> Result<Panorama, HorizonError> {
        self.sweep(grid, observer, params, Some(cancel))
    }

    fn sweep(
        &self,
        grid: &ElevationGrid,
        observer: Coord<C>,
        params: &PanoramaParams,
        cancel: Option<&AtomicBool>,
    ) -> Result<Panorama, HorizonError> {
        let observer_elev_m =
            observer_elevation(grid, observer)? + params.radial().observer_height_m();

        let now = std::time::Instant::now();
        let azimuths: Vec<C> = params.azimuths().collect();
        let silhouette: Option<Vec<Silhouette>> = azimuths
            .into_par_iter()
            .map(|azimuth| {
                if cancel.is_some_and(|cancel| cancel.load(Ordering::Relaxed)) {
                    return None;
                }
                let profile = self.profile(grid, observer, azimuth, params.radial());
                Some(Silhouette::from_profile(azimuth, profile))
            })
            .collect();
        let silhouette = silhouette.ok_or(HorizonError::Cancelled)?;

        debug!(
            "panorama; azimuths: {}, steps: {}, exec: {:?}",
            silhouette.len(),
            params.radial().step_count(),
            now.elapsed()
        );

        Ok(Panorama {
            observer,
            observer_elev_m,
            silhouette,
        })
    }
}
