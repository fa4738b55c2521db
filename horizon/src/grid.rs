//! Georeferenced elevation samples.

use crate::{HorizonError, C};
use geo::geometry::{Coord, Rect};
use nasadem::{Tile, VOID};

/// Affine transform between pixel (col, row) and geographic (lon,
/// lat) coordinates.
///
/// ```text
/// lon = origin.x + col * pixel_width + row * row_rotation
/// lat = origin.y + col * col_rotation + row * pixel_height
/// ```
///
/// `origin` is the outer corner of pixel (0, 0). For north-up
/// rasters the rotations are 0 and `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin: Coord<C>,
    pub pixel_width: C,
    pub pixel_height: C,
    pub row_rotation: C,
    pub col_rotation: C,
}

impl GeoTransform {
    /// Returns a north-up transform without rotation.
    pub fn new(origin: Coord<C>, pixel_width: C, pixel_height: C) -> Self {
        Self {
            origin,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Builds a transform from GDAL ordered coefficients:
    /// `[origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]`.
    pub fn from_gdal(coefficients: [C; 6]) -> Self {
        let [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height] =
            coefficients;
        Self {
            origin: Coord {
                x: origin_x,
                y: origin_y,
            },
            pixel_width,
            pixel_height,
            row_rotation,
            col_rotation,
        }
    }

    fn determinant(&self) -> C {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    /// Returns the geographic coordinate of fractional pixel (`col`, `row`).
    pub fn pixel_to_geo(&self, col: C, row: C) -> Coord<C> {
        Coord {
            x: self.origin.x + col * self.pixel_width + row * self.row_rotation,
            y: self.origin.y + col * self.col_rotation + row * self.pixel_height,
        }
    }

    /// Returns fractional (col, row) for `coord`.
    pub fn geo_to_pixel(&self, coord: Coord<C>) -> (C, C) {
        let det = self.determinant();
        let dx = coord.x - self.origin.x;
        let dy = coord.y - self.origin.y;
        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (self.pixel_width * dy - self.col_rotation * dx) / det;
        (col, row)
    }

    /// Returns the rectangle covered by a `rows` x `cols` raster.
    #[allow(clippy::cast_precision_loss)]
    pub fn bounds(&self, rows: usize, cols: usize) -> Rect<C> {
        let (rows, cols) = (rows as C, cols as C);
        let corners = [
            self.pixel_to_geo(0.0, 0.0),
            self.pixel_to_geo(cols, 0.0),
            self.pixel_to_geo(0.0, rows),
            self.pixel_to_geo(cols, rows),
        ];
        let (min, max) = corners.iter().skip(1).fold(
            (corners[0], corners[0]),
            |(min, max), c| {
                (
                    Coord {
                        x: min.x.min(c.x),
                        y: min.y.min(c.y),
                    },
                    Coord {
                        x: max.x.max(c.x),
                        y: max.y.max(c.y),
                    },
                )
            },
        );
        Rect::new(min, max)
    }
}

/// An immutable, georeferenced grid of elevation samples (meters).
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    /// Row-major samples.
    samples: Box<[f32]>,

    /// Number of (rows, columns).
    dimensions: (usize, usize),

    transform: GeoTransform,

    /// Geographic coverage, derived from `transform` and `dimensions`.
    bounds: Rect<C>,

    /// Void marker, if the source has one.
    nodata: Option<f32>,
}

impl ElevationGrid {
    pub fn new(
        samples: impl Into<Box<[f32]>>,
        rows: usize,
        cols: usize,
        transform: GeoTransform,
    ) -> Result<Self, HorizonError> {
        let samples = samples.into();
        if rows == 0 || cols == 0 || samples.len() != rows * cols {
            return Err(HorizonError::GridShape {
                len: samples.len(),
                rows,
                cols,
            });
        }
        let det = transform.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(HorizonError::DegenerateTransform);
        }
        let bounds = transform.bounds(rows, cols);
        Ok(Self {
            samples,
            dimensions: (rows, cols),
            transform,
            bounds,
            nodata: None,
        })
    }

    /// Treat samples equal to `nodata` as missing.
    #[must_use]
    pub fn with_nodata(mut self, nodata: f32) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn rows(&self) -> usize {
        self.dimensions.0
    }

    pub fn cols(&self) -> usize {
        self.dimensions.1
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn bounds(&self) -> Rect<C> {
        self.bounds
    }

    pub fn nodata(&self) -> Option<f32> {
        self.nodata
    }

    /// Returns true if `coord` lies within the grid's bounds, edges
    /// included.
    ///
    /// This is a cheap pre-filter; [`Self::sample`] may still reject
    /// points on the far edges.
    pub fn contains(&self, coord: Coord<C>) -> bool {
        let (min, max) = (self.bounds.min(), self.bounds.max());
        min.x <= coord.x && coord.x <= max.x && min.y <= coord.y && coord.y <= max.y
    }

    /// Returns the elevation of the pixel containing `coord`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn sample(&self, coord: Coord<C>) -> Result<C, HorizonError> {
        let (rows, cols) = self.dimensions;
        let (col, row) = self.transform.geo_to_pixel(coord);
        let (col, row) = (col.floor(), row.floor());

        if !(0.0..cols as C).contains(&col) || !(0.0..rows as C).contains(&row) {
            return Err(HorizonError::OutOfBounds {
                point: coord,
                row: row as isize,
                col: col as isize,
            });
        }

        let sample = self.samples[row as usize * cols + col as usize];
        if sample.is_nan() || Some(sample) == self.nodata {
            return Err(HorizonError::NoData { point: coord });
        }
        Ok(C::from(sample))
    }
}

impl TryFrom<Tile> for ElevationGrid {
    type Error = HorizonError;

    /// Georeferences a decoded HGT tile, treating its samples as
    /// pixel areas centered on the sample posts.
    fn try_from(tile: Tile) -> Result<Self, HorizonError> {
        let (rows, cols) = tile.dimensions();
        let spacing = tile.sample_spacing();
        let transform = GeoTransform::new(tile.nw_edge(), spacing, -spacing);
        let samples: Vec<f32> = tile
            .into_samples()
            .iter()
            .map(|&sample| f32::from(sample))
            .collect();
        Ok(Self::new(samples, rows, cols, transform)?.with_nodata(f32::from(VOID)))
    }
}
