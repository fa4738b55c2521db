//! NASADEM evelation (`.hgt`) file format.
//!
//! This crate only decodes tiles. Georeferencing and lookup are the
//! business of whoever consumes [`Tile`].
//!
//! # References
//!
//! 1. [30-Meter SRTM Tile Downloader](https://dwtkns.com/srtm30m)
//! 1. [Archive Team](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

mod error;

pub use crate::error::NasademError;
use byteorder::{BigEndian as BE, ReadBytesExt};
use geo::geometry::Coord;
use std::{fs::File, io::BufReader, mem::size_of, path::Path};

/// Base floating point type used for all coordinates.
pub type C = f64;

/// Sample value SRTM uses to mark voids.
pub const VOID: i16 = i16::MIN;

const ARCSEC_PER_DEG: C = 3600.0;

/// A decoded HGT tile.
///
/// Samples are stored in file order: row 0 is the northern edge of
/// the tile, column 0 the western edge.
#[derive(Debug, Clone)]
pub struct Tile {
    /// Southwest corner of the tile, in whole degrees.
    ///
    /// Specificlly, the _center_ of the SW most sample of the tile.
    sw_corner: Coord<i16>,

    /// Arcseconds per sample.
    resolution: u8,

    /// Number of (rows, columns) in this tile.
    dimensions: (usize, usize),

    /// Elevation samples.
    samples: Box<[i16]>,
}

impl Tile {
    /// Returns a Tile read into memory from the file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, NasademError> {
        let (resolution, dimensions @ (rows, cols)) = extract_resolution(&path)?;
        let sw_corner = parse_sw_corner(&path)?;

        let mut file = BufReader::new(File::open(path)?);

        let samples = {
            let mut sample_store = Vec::with_capacity(rows * cols);
            for _ in 0..(rows * cols) {
                let sample = file.read_i16::<BE>()?;
                sample_store.push(sample);
            }
            sample_store.into_boxed_slice()
        };

        Ok(Self {
            sw_corner,
            resolution,
            dimensions,
            samples,
        })
    }

    /// Returns the number of samples in this tile.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        let (rows, cols) = self.dimensions;
        rows * cols
    }

    /// Returns this tile's resolution in arcseconds per sample.
    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    /// Returns the distance between adjacent samples, in degrees.
    pub fn sample_spacing(&self) -> C {
        C::from(self.resolution) / ARCSEC_PER_DEG
    }

    /// Returns (rows, columns).
    pub fn dimensions(&self) -> (usize, usize) {
        self.dimensions
    }

    /// Returns the integer southwest corner this tile is named after.
    pub fn sw_corner(&self) -> Coord<i16> {
        self.sw_corner
    }

    /// Returns the outer northwest corner of the tile.
    ///
    /// Samples sit on whole-degree lines, so the outer edge of the
    /// NW-most sample lies half a sample spacing north and west of
    /// the tile's nominal corner.
    pub fn nw_edge(&self) -> Coord<C> {
        let half = self.sample_spacing() / 2.0;
        Coord {
            x: C::from(self.sw_corner.x) - half,
            y: C::from(self.sw_corner.y) + 1.0 + half,
        }
    }

    /// Returns the sample at (`row`, `col`), if any.
    pub fn get(&self, row: usize, col: usize) -> Option<i16> {
        let (rows, cols) = self.dimensions;
        if row < rows && col < cols {
            Some(self.samples[row * cols + col])
        } else {
            None
        }
    }

    /// Returns all samples in row-major order.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Consumes this tile, returning its row-major samples.
    pub fn into_samples(self) -> Box<[i16]> {
        self.samples
    }

    /// Returns the lowest non-void elevation sample in this tile.
    pub fn min_elevation(&self) -> Option<i16> {
        self.samples.iter().copied().filter(|s| *s != VOID).min()
    }

    /// Returns the highest non-void elevation sample in this tile.
    pub fn max_elevation(&self) -> Option<i16> {
        self.samples.iter().copied().filter(|s| *s != VOID).max()
    }
}

fn extract_resolution<P: AsRef<Path>>(path: P) -> Result<(u8, (usize, usize)), NasademError> {
    const RES_1_ARCSECONDS_FILE_LEN: u64 = 3601 * 3601 * size_of::<u16>() as u64;
    const RES_3_ARCSECONDS_FILE_LEN: u64 = 1201 * 1201 * size_of::<u16>() as u64;
    match path.as_ref().metadata().map(|m| m.len())? {
        RES_1_ARCSECONDS_FILE_LEN => Ok((1, (3601, 3601))),
        RES_3_ARCSECONDS_FILE_LEN => Ok((3, (1201, 1201))),
        invalid_len => Err(NasademError::HgtLen(
            invalid_len,
            path.as_ref().to_owned(),
        )),
    }
}

fn parse_sw_corner<P: AsRef<Path>>(path: P) -> Result<Coord<i16>, NasademError> {
    let mk_err = || NasademError::HgtName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?
        .to_ascii_uppercase();
    if name.len() != 7 {
        return Err(mk_err());
    }
    let lat_sign = match &name[0..1] {
        "N" => 1,
        "S" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * name[1..3].parse::<i16>().map_err(|_| mk_err())?;
    let lon_sign = match &name[3..4] {
        "E" => 1,
        "W" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * name[4..7].parse::<i16>().map_err(|_| mk_err())?;
    Ok(Coord { x: lon, y: lat })
}
