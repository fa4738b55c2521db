use geo::geometry::Coord;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HorizonError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("invalid {name}: {value}")]
    InvalidParam { name: &'static str, value: f64 },

    #[error("{len} samples do not fill a {rows}x{cols} grid")]
    GridShape { len: usize, rows: usize, cols: usize },

    #[error("geo transform is not invertible")]
    DegenerateTransform,

    #[error(
        "({lat}, {lon}) maps to pixel (row {row}, col {col}), outside the grid",
        lat = .point.y,
        lon = .point.x
    )]
    OutOfBounds {
        point: Coord<f64>,
        row: isize,
        col: isize,
    },

    #[error("no elevation data at ({lat}, {lon})", lat = .point.y, lon = .point.x)]
    NoData { point: Coord<f64> },

    #[error(
        "observer ({lat}, {lon}) is outside the elevation data",
        lat = .point.y,
        lon = .point.x
    )]
    ObserverOutOfRange { point: Coord<f64> },

    #[error(
        "no elevation for observer ({lat}, {lon}): {reason}",
        lat = .point.y,
        lon = .point.x
    )]
    ObserverElevationUnavailable {
        point: Coord<f64>,
        reason: Box<HorizonError>,
    },

    #[error("computation cancelled")]
    Cancelled,
}
