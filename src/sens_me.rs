//! # sensMe Plane
//!
//! A two-dimensional mood/energy representation shared by songs, genres
//! and styles. Distances between any two of them are plain Euclidean
//! distances in this plane.
//!
//! Song coordinates are not computed yet: every song sits on
//! [`SensMe::PLACEHOLDER`] until per-song values can be extracted from
//! the audio itself or a reference database.

use crate::error::{RecomError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the sensMe plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SensMe {
    pub x: f64,
    pub y: f64,
}

impl SensMe {
    /// Value assigned to every song until the sensMe system exists.
    pub const PLACEHOLDER: SensMe = SensMe { x: 1.0, y: 1.0 };

    /// Origin of the plane, used by the category tables.
    pub const ORIGIN: SensMe = SensMe { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Builds a point from raw coordinates.
    ///
    /// # Errors
    ///
    /// [`RecomError::MalformedSensMe`] unless `coords` holds exactly two values.
    pub fn from_slice(coords: &[f64]) -> Result<Self> {
        match coords {
            [x, y] => Ok(Self::new(*x, *y)),
            _ => Err(RecomError::MalformedSensMe(coords.len())),
        }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: &SensMe) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for SensMe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Euclidean distance between two sensMe points.
#[must_use]
pub fn distance_sens_me(first: SensMe, second: SensMe) -> f64 {
    first.distance(&second)
}

/// Same as [`distance_sens_me`], for coordinates that have not been
/// validated yet.
///
/// # Errors
///
/// [`RecomError::MalformedSensMe`] if either side is not a pair.
pub fn distance_sens_me_raw(first: &[f64], second: &[f64]) -> Result<f64> {
    let first = SensMe::from_slice(first)?;
    let second = SensMe::from_slice(second)?;
    Ok(distance_sens_me(first, second))
}
