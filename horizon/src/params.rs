//! Validated query parameters.

use crate::{math::linspace, HorizonError, C};

/// Nearest distance sampled along a ray; keeps the first angle away
/// from the observer's own pixel.
pub const DEFAULT_MIN_DISTANCE_M: C = 100.0;

pub const DEFAULT_MAX_DISTANCE_M: C = 100_000.0;

/// Radial steps for a single-bearing profile.
pub const DEFAULT_PROFILE_STEPS: usize = 1000;

/// Radial steps per bearing in a panorama.
pub const DEFAULT_PANORAMA_STEPS: usize = 200;

pub const DEFAULT_AZIMUTHS: usize = 360;

/// Radial sampling for one bearing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileParams {
    step_count: usize,
    min_distance_m: C,
    max_distance_m: C,
    observer_height_m: C,
}

impl ProfileParams {
    pub fn builder() -> ProfileParamsBuilder {
        ProfileParamsBuilder {
            step_count: None,
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            max_distance_m: None,
            observer_height_m: 0.0,
        }
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn min_distance_m(&self) -> C {
        self.min_distance_m
    }

    pub fn max_distance_m(&self) -> C {
        self.max_distance_m
    }

    pub fn observer_height_m(&self) -> C {
        self.observer_height_m
    }

    /// Returns the `step_count` sampling distances, nearest first.
    pub fn distances(&self) -> impl Iterator<Item = C> {
        linspace(self.min_distance_m, self.max_distance_m, self.step_count)
    }

    #[allow(clippy::cast_precision_loss)]
    fn validate(self) -> Result<Self, HorizonError> {
        if self.step_count == 0 {
            return Err(HorizonError::InvalidParam {
                name: "step_count",
                value: self.step_count as C,
            });
        }
        if !(self.min_distance_m.is_finite() && self.min_distance_m > 0.0) {
            return Err(HorizonError::InvalidParam {
                name: "min_distance",
                value: self.min_distance_m,
            });
        }
        if !(self.max_distance_m.is_finite() && self.max_distance_m >= self.min_distance_m) {
            return Err(HorizonError::InvalidParam {
                name: "max_distance",
                value: self.max_distance_m,
            });
        }
        if !self.observer_height_m.is_finite() {
            return Err(HorizonError::InvalidParam {
                name: "observer_height",
                value: self.observer_height_m,
            });
        }
        Ok(self)
    }
}

impl Default for ProfileParams {
    fn default() -> Self {
        Self {
            step_count: DEFAULT_PROFILE_STEPS,
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            max_distance_m: DEFAULT_MAX_DISTANCE_M,
            observer_height_m: 0.0,
        }
    }
}

pub struct ProfileParamsBuilder {
    /// Number of distances to sample (required).
    step_count: Option<usize>,

    /// Nearest sampled distance (meters, defaults to 100).
    min_distance_m: C,

    /// Farthest sampled distance (required).
    max_distance_m: Option<C>,

    /// Observer's height above ground (meters, defaults to 0).
    observer_height_m: C,
}

impl ProfileParamsBuilder {
    /// Number of distances to sample (required).
    #[must_use]
    pub fn step_count(mut self, steps: usize) -> Self {
        self.step_count = Some(steps);
        self
    }

    /// Nearest sampled distance (meters, defaults to 100).
    #[must_use]
    pub fn min_distance(mut self, meters: C) -> Self {
        self.min_distance_m = meters;
        self
    }

    /// Farthest sampled distance (meters, required).
    #[must_use]
    pub fn max_distance(mut self, meters: C) -> Self {
        self.max_distance_m = Some(meters);
        self
    }

    /// Observer's height above ground (meters, defaults to 0).
    #[must_use]
    pub fn observer_height(mut self, meters: C) -> Self {
        self.observer_height_m = meters;
        self
    }

    pub fn build(&self) -> Result<ProfileParams, HorizonError> {
        ProfileParams {
            step_count: self.step_count.ok_or(HorizonError::Builder("step_count"))?,
            min_distance_m: self.min_distance_m,
            max_distance_m: self
                .max_distance_m
                .ok_or(HorizonError::Builder("max_distance"))?,
            observer_height_m: self.observer_height_m,
        }
        .validate()
    }
}

/// Angular and radial sampling for a full sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanoramaParams {
    azimuth_count: usize,
    radial: ProfileParams,
}

impl PanoramaParams {
    pub fn builder() -> PanoramaParamsBuilder {
        PanoramaParamsBuilder {
            azimuth_count: None,
            radial: ProfileParams::builder().step_count(DEFAULT_PANORAMA_STEPS),
        }
    }

    pub fn azimuth_count(&self) -> usize {
        self.azimuth_count
    }

    /// Radial sampling used for every bearing.
    pub fn radial(&self) -> &ProfileParams {
        &self.radial
    }

    /// Returns the bearings of the sweep, `[0, 360)` in equal
    /// increments.
    #[allow(clippy::cast_precision_loss)]
    pub fn azimuths(&self) -> impl Iterator<Item = C> + Clone {
        let n = self.azimuth_count as C;
        (0..self.azimuth_count).map(move |i| i as C * 360.0 / n)
    }
}

impl Default for PanoramaParams {
    fn default() -> Self {
        Self {
            azimuth_count: DEFAULT_AZIMUTHS,
            radial: ProfileParams {
                step_count: DEFAULT_PANORAMA_STEPS,
                ..ProfileParams::default()
            },
        }
    }
}

pub struct PanoramaParamsBuilder {
    /// Number of bearings (required).
    azimuth_count: Option<usize>,

    radial: ProfileParamsBuilder,
}

impl PanoramaParamsBuilder {
    /// Number of bearings (required).
    #[must_use]
    pub fn azimuth_count(mut self, azimuths: usize) -> Self {
        self.azimuth_count = Some(azimuths);
        self
    }

    /// Distances sampled per bearing (defaults to 200).
    #[must_use]
    pub fn step_count(mut self, steps: usize) -> Self {
        self.radial = self.radial.step_count(steps);
        self
    }

    /// Nearest sampled distance (meters, defaults to 100).
    #[must_use]
    pub fn min_distance(mut self, meters: C) -> Self {
        self.radial = self.radial.min_distance(meters);
        self
    }

    /// Farthest sampled distance (meters, required).
    #[must_use]
    pub fn max_distance(mut self, meters: C) -> Self {
        self.radial = self.radial.max_distance(meters);
        self
    }

    /// Observer's height above ground (meters, defaults to 0).
    #[must_use]
    pub fn observer_height(mut self, meters: C) -> Self {
        self.radial = self.radial.observer_height(meters);
        self
    }

    pub fn build(&self) -> Result<PanoramaParams, HorizonError> {
        let azimuth_count = self
            .azimuth_count
            .ok_or(HorizonError::Builder("azimuth_count"))?;
        if azimuth_count == 0 {
            return Err(HorizonError::InvalidParam {
                name: "azimuth_count",
                value: 0.0,
            });
        }
        Ok(PanoramaParams {
            azimuth_count,
            radial: self.radial.build()?,
        })
    }
}
