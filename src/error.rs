//! Error types shared by the distance and validation modules.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Result type for Recom domain operations
pub type Result<T> = std::result::Result<T, RecomError>;

/// Validation and lookup failures raised while building or comparing
/// songs and user states.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecomError {
    /// IMEI is not exactly 15 decimal digits
    #[error("Invalid IMEI `{0}`: expected exactly 15 digits")]
    InvalidImei(String),

    /// Activity label outside the fixed activity set
    #[error("Unknown activity `{0}`")]
    UnknownActivity(String),

    /// Location is not a valid WGS84 latitude/longitude pair
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Timestamp text could not be parsed
    #[error("Invalid timestamp `{0}`: expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp(String),

    /// Song query string is empty
    #[error("Song query string is empty")]
    EmptyQuery,

    #[error("Genre `{0}` is not recognized")]
    UnrecognizedGenre(String),

    #[error("Style `{0}` is not recognized")]
    UnrecognizedStyle(String),

    /// sensMe point with the wrong number of coordinates
    #[error("sensMe point has {0} coordinates, expected 2")]
    MalformedSensMe(usize),

    /// Geocoder returned nothing for a place name
    #[error("Could not geocode `{0}`")]
    Geocode(String),

    /// Vincenty iteration did not converge (nearly antipodal points)
    #[error("Distance between {0} and {1} failed to converge")]
    NoConvergence(String, String),

    #[error("Catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),
}
