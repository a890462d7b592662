//! # Geodesy
//!
//! WGS84 coordinates, the Vincenty inverse formula for distances on the
//! ellipsoid, and the [`Geocoder`] seam used to turn place names (such as
//! a release country) into coordinates.
//!
//! ## Distances
//!
//! [`vincenty_distance`] iterates on the auxiliary sphere until the
//! longitude difference converges. Nearly antipodal points may never
//! converge; those report [`RecomError::NoConvergence`] instead of an
//! inaccurate value.

use crate::error::{RecomError, Result};
use anyhow::Context;
use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// WGS84 semi-major axis, meters
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE_THRESHOLD: f64 = 1e-12;

/// A validated WGS84 latitude/longitude pair, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// # Errors
    ///
    /// [`RecomError::InvalidLocation`] if either value is not finite or is
    /// out of range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(RecomError::InvalidLocation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(RecomError::InvalidLocation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// Builds coordinates from raw values.
    ///
    /// # Errors
    ///
    /// [`RecomError::InvalidLocation`] unless `coords` is exactly one valid
    /// latitude/longitude pair.
    pub fn from_slice(coords: &[f64]) -> Result<Self> {
        match coords {
            [latitude, longitude] => Self::new(*latitude, *longitude),
            _ => Err(RecomError::InvalidLocation(format!(
                "expected 2 coordinates, got {}",
                coords.len()
            ))),
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<[f64; 2]> for Coordinates {
    type Error = RecomError;

    fn try_from([latitude, longitude]: [f64; 2]) -> Result<Self> {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.latitude, coords.longitude]
    }
}

/// Parses the telemetry form `"lat,lon"`.
impl FromStr for Coordinates {
    type Err = RecomError;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f64>()
                    .map_err(|_| RecomError::InvalidLocation(format!("`{s}` is not a number pair")))
            })
            .collect::<Result<Vec<f64>>>()?;
        Self::from_slice(&values)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Geodesic distance in meters between two points on the WGS84
/// ellipsoid (Vincenty inverse formula).
///
/// # Design Notes
///
/// The longitude difference on the auxiliary sphere is refined until it
/// changes by less than `1e-12` radians, for at most 200 rounds.
/// Coincident points short-circuit to `0.0`. Equatorial lines are handled
/// by treating `cos² α = 0` as a zero `cos 2σm` term.
///
/// # Errors
///
/// [`RecomError::NoConvergence`] when the iteration does not settle,
/// which only happens for nearly antipodal points.
pub fn vincenty_distance(from: Coordinates, to: Coordinates) -> Result<f64> {
    let a = WGS84_A;
    let f = WGS84_F;
    let b = (1.0 - f) * a;

    let l = (to.longitude - from.longitude).to_radians();
    let u1 = ((1.0 - f) * from.latitude.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * to.latitude.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // Coincident points
            return Ok(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha.powi(2);
        // Equatorial lines have cos_sq_alpha == 0
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < CONVERGENCE_THRESHOLD {
            let u_sq = cos_sq_alpha * (a.powi(2) - b.powi(2)) / b.powi(2);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            let meters = b * big_a * (sigma - delta_sigma);
            trace!("Vincenty distance {from} -> {to}: {meters} m");
            return Ok(meters);
        }
    }

    Err(RecomError::NoConvergence(from.to_string(), to.to_string()))
}

/// Resolves place names to coordinates.
pub trait Geocoder: Send + Sync {
    /// Coordinates for `place`, or `None` if the place is unknown.
    fn geocode(&self, place: &str) -> Option<Coordinates>;
}

/// In-memory geocoder over a fixed name -> coordinates table.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    places: HashMap<String, Coordinates>,
}

impl Gazetteer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a place.
    pub fn insert(&mut self, place: &str, coords: Coordinates) {
        self.places.insert(place.trim().to_lowercase(), coords);
    }

    #[must_use]
    pub fn with_place(mut self, place: &str, coords: Coordinates) -> Self {
        self.insert(place, coords);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Loads a JSON object mapping place names to `[lat, lon]` pairs.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gazetteer at {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Invalid gazetteer file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let entries: HashMap<String, Coordinates> =
            serde_json::from_str(raw).context("Gazetteer must map names to [lat, lon] pairs")?;
        let mut gazetteer = Self::new();
        for (place, coords) in entries {
            gazetteer.insert(&place, coords);
        }
        Ok(gazetteer)
    }
}

impl Geocoder for Gazetteer {
    fn geocode(&self, place: &str) -> Option<Coordinates> {
        self.places.get(&place.trim().to_lowercase()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn test_one_degree_on_equator() {
        let d = vincenty_distance(coords(0.0, 0.0), coords(0.0, 1.0)).unwrap();
        assert!((d - 111_319.490_8).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_flinders_peak_to_buninyong() {
        // Reference geodesic from Vincenty's 1975 paper
        let flinders = coords(-37.951_033_416_7, 144.424_867_888_9);
        let buninyong = coords(-37.652_821_138_9, 143.926_495_527_8);
        let d = vincenty_distance(flinders, buninyong).unwrap();
        assert!((d - 54_972.271).abs() < 0.01, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_same_point() {
        let paris = coords(48.8566, 2.3522);
        let cleveland = coords(41.512_108, -81.607_045);
        let there = vincenty_distance(paris, cleveland).unwrap();
        let back = vincenty_distance(cleveland, paris).unwrap();
        assert!((there - back).abs() < 1e-6);
        assert_eq!(vincenty_distance(paris, paris).unwrap(), 0.0);
    }

    #[test]
    fn test_antipodal_points_do_not_converge() {
        assert_eq!(
            vincenty_distance(coords(0.0, 0.0), coords(0.0, 180.0)),
            Err(RecomError::NoConvergence("0,0".to_string(), "0,180".to_string()))
        );
        assert!(matches!(
            vincenty_distance(coords(10.0, 0.0), coords(-10.0, 180.0)),
            Err(RecomError::NoConvergence(_, _))
        ));
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::from_slice(&[1.0, 2.0, 3.0]).is_err());
        assert!(Coordinates::from_slice(&[1.0]).is_err());
    }

    #[test]
    fn test_parse_telemetry_location() {
        let parsed: Coordinates = "41.512108,-81.607045".parse().unwrap();
        assert_eq!(parsed.latitude(), 41.512108);
        assert_eq!(parsed.longitude(), -81.607045);

        assert!("41.5".parse::<Coordinates>().is_err());
        assert!("41.5,-81.6,3".parse::<Coordinates>().is_err());
        assert!("north,west".parse::<Coordinates>().is_err());
    }

    #[test]
    fn test_gazetteer_lookup_is_case_insensitive() {
        let gazetteer = Gazetteer::new().with_place("France", coords(46.2276, 2.2137));
        assert_eq!(gazetteer.geocode("france"), Some(coords(46.2276, 2.2137)));
        assert_eq!(gazetteer.geocode("Atlantis"), None);
    }

    #[test]
    fn test_gazetteer_from_json() {
        let gazetteer =
            Gazetteer::from_json_str(r#"{"US": [37.09, -95.71], "UK": [55.37, -3.43]}"#).unwrap();
        assert_eq!(gazetteer.len(), 2);
        assert!(gazetteer.geocode("uk").is_some());

        assert!(Gazetteer::from_json_str(r#"{"Nowhere": [123.0, 0.0]}"#).is_err());
    }
}
