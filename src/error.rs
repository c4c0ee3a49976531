//! Errors raised while loading and summarising the nuclear share dataset

use thiserror::Error;

/// Dataset loading failures. Any of these leaves the map in the
/// "data unavailable" state instead of drawing meaningless symbols.
#[derive(Error, Debug)]
pub enum DataError {
    /// The data file could not be read
    #[error("could not read data file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid GeoJSON
    #[error("malformed GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    /// Valid GeoJSON, but not a FeatureCollection
    #[error("expected a FeatureCollection")]
    NotFeatureCollection,

    /// The collection has no features to draw
    #[error("feature collection is empty")]
    EmptyCollection,

    /// No property looked like a year attribute (`pct_<year>`)
    #[error("no year attributes (pct_<year>) found in feature properties")]
    NoAttributes,

    /// Every value is either the no-data sentinel or zero
    #[error("dataset contains no valid (positive) values")]
    NoValidValues,

    /// A feature without a point we can place a symbol on
    #[error("feature {country:?} has no point geometry")]
    MissingGeometry { country: String },
}

pub type Result<T> = std::result::Result<T, DataError>;
