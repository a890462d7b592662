//! # User States
//!
//! One telemetry sample: which device, doing what, where, when, and
//! listening to which song. All fields are validated on the way in, so a
//! constructed [`UserState`] is always comparable with another one.

use crate::error::{RecomError, Result};
use crate::geo::{vincenty_distance, Coordinates, Geocoder};
use crate::song::{Song, SongDistance};
use chrono::{Duration, NaiveDateTime};
use log::trace;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Telemetry timestamp layout.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const IMEI_DIGITS: usize = 15;

/// Device identifier: exactly 15 decimal digits, leading zeros included.
///
/// The text form is canonical. The numeric form of an IMEI that starts
/// with `0` has fewer than 15 significant digits and is zero-padded back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Imei(String);

impl Imei {
    /// Builds an IMEI from its numeric form.
    ///
    /// # Errors
    ///
    /// [`RecomError::InvalidImei`] if `value` needs more than 15 digits.
    pub fn new(value: u64) -> Result<Self> {
        if value <= 999_999_999_999_999 {
            Ok(Self(format!("{value:0width$}", width = IMEI_DIGITS)))
        } else {
            Err(RecomError::InvalidImei(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Imei {
    type Err = RecomError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim();
        if digits.len() == IMEI_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(digits.to_string()))
        } else {
            Err(RecomError::InvalidImei(s.to_string()))
        }
    }
}

impl fmt::Display for Imei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the user is doing, ordered by intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Activity {
    Still,
    OnFoot,
    OnBicycle,
    InVehicle,
}

impl Activity {
    pub const ALL: [Activity; 4] = [
        Activity::Still,
        Activity::OnFoot,
        Activity::OnBicycle,
        Activity::InVehicle,
    ];

    /// Intensity rank, from 0 (`STILL`) to 3 (`IN_VEHICLE`).
    #[must_use]
    pub const fn rank(self) -> i8 {
        match self {
            Activity::Still => 0,
            Activity::OnFoot => 1,
            Activity::OnBicycle => 2,
            Activity::InVehicle => 3,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Activity::Still => "STILL",
            Activity::OnFoot => "ON_FOOT",
            Activity::OnBicycle => "ON_BICYCLE",
            Activity::InVehicle => "IN_VEHICLE",
        }
    }
}

impl FromStr for Activity {
    type Err = RecomError;

    fn from_str(s: &str) -> Result<Self> {
        Activity::ALL
            .into_iter()
            .find(|activity| activity.label() == s.trim())
            .ok_or_else(|| RecomError::UnknownActivity(s.to_string()))
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a telemetry timestamp (`YYYY-MM-DD HH:MM:SS`).
///
/// # Errors
///
/// [`RecomError::InvalidTimestamp`] for any other layout.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .map_err(|_| RecomError::InvalidTimestamp(text.to_string()))
}

/// One telemetry sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserState {
    imei: Imei,
    activity: Activity,
    location: Coordinates,
    timestamp: NaiveDateTime,
    song: Song,
}

impl UserState {
    #[must_use]
    pub fn new(imei: Imei, activity: Activity, location: Coordinates, timestamp: NaiveDateTime, song: Song) -> Self {
        Self {
            imei,
            activity,
            location,
            timestamp,
            song,
        }
    }

    #[must_use]
    pub fn imei(&self) -> &Imei {
        &self.imei
    }

    #[must_use]
    pub fn activity(&self) -> Activity {
        self.activity
    }

    #[must_use]
    pub fn location(&self) -> Coordinates {
        self.location
    }

    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    #[must_use]
    pub fn song(&self) -> &Song {
        &self.song
    }

    /// Shorthand for [`distance_user_states`].
    pub fn distance(&self, other: &UserState, geocoder: &dyn Geocoder) -> Result<UserStateDistance> {
        distance_user_states(self, other, geocoder)
    }
}

/// Distances between two user states.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStateDistance {
    /// Meters between the two locations
    pub location: f64,
    pub activity: i8,
    pub song: SongDistance,
    /// Serialized as whole seconds
    #[serde(serialize_with = "serialize_seconds")]
    pub time: Duration,
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

/// Geodesic distance in meters between two locations.
pub fn distance_locations(first: Coordinates, second: Coordinates) -> Result<f64> {
    vincenty_distance(first, second)
}

/// Change in activity intensity. Positive when `second` is more intense
/// (the user accelerated), negative when the user slowed down.
#[must_use]
pub fn distance_activities(first: Activity, second: Activity) -> i8 {
    second.rank() - first.rank()
}

/// Signed time elapsed from `first` to `second`.
#[must_use]
pub fn distance_timestamps(first: NaiveDateTime, second: NaiveDateTime) -> Duration {
    second.signed_duration_since(first)
}

/// Location, activity, song and time distances between two user states.
///
/// # Returns
///
/// A [`UserStateDistance`] where:
/// - `location` is the Vincenty distance in meters
/// - `activity` is [`distance_activities`], positive if the user sped up
/// - `song` holds every [`SongDistance`] component
/// - `time` is the signed duration from `first` to `second`
///
/// # Errors
///
/// - [`RecomError::NoConvergence`] for nearly antipodal locations
/// - any [`distance_songs`](crate::song::distance_songs) failure
///   (unrecognized genre or style, ungeocodable country)
///
/// # Examples
///
/// ```
/// use recom::geo::Gazetteer;
/// use recom::song::Song;
/// use recom::catalog::ReleaseDetails;
/// use recom::user_state::{distance_user_states, parse_timestamp, Activity, Imei, UserState};
///
/// let song = Song::from_release("Believe", 3, &ReleaseDetails::default())?;
/// let imei = Imei::new(123_456_789_012_345)?;
/// let before = UserState::new(
///     imei.clone(),
///     Activity::OnFoot,
///     "0,0".parse()?,
///     parse_timestamp("2015-03-01 12:00:00")?,
///     song.clone(),
/// );
/// let after = UserState::new(
///     imei,
///     Activity::Still,
///     "0,1".parse()?,
///     parse_timestamp("2015-03-01 11:59:00")?,
///     song,
/// );
///
/// let distance = distance_user_states(&before, &after, &Gazetteer::new())?;
/// assert_eq!(distance.activity, -1);
/// assert_eq!(distance.time.num_seconds(), -60);
/// assert_eq!(distance.song.distance_genre, -1.0);
/// # Ok::<(), recom::error::RecomError>(())
/// ```
pub fn distance_user_states(
    first: &UserState,
    second: &UserState,
    geocoder: &dyn Geocoder,
) -> Result<UserStateDistance> {
    let distance = UserStateDistance {
        location: distance_locations(first.location, second.location)?,
        activity: distance_activities(first.activity, second.activity),
        song: first.song.distance(&second.song, geocoder)?,
        time: distance_timestamps(first.timestamp, second.timestamp),
    };
    trace!("User state distance {} -> {}: {distance:?}", first.imei, second.imei);
    Ok(distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ReleaseDetails;
    use crate::geo::Gazetteer;

    fn state(imei: &str, activity: Activity, location: &str, timestamp: &str) -> UserState {
        let details = ReleaseDetails {
            genres: vec!["Pop".to_string()],
            year: Some(1997),
            ..ReleaseDetails::default()
        };
        UserState::new(
            imei.parse().unwrap(),
            activity,
            location.parse().unwrap(),
            parse_timestamp(timestamp).unwrap(),
            Song::from_release("Barbie Girl", 1042, &details).unwrap(),
        )
    }

    #[test]
    fn test_imei_requires_fifteen_digits() {
        assert!(Imei::new(123_456_789_012_345).is_ok());
        assert!(Imei::new(1_234_567_890_123_456).is_err());
        assert!("123456789012345".parse::<Imei>().is_ok());
        assert!("12345678901234".parse::<Imei>().is_err());
        assert!("1234567890123456".parse::<Imei>().is_err());
        assert!("12345678901234a".parse::<Imei>().is_err());
        assert_eq!(
            "".parse::<Imei>(),
            Err(RecomError::InvalidImei(String::new()))
        );
    }

    #[test]
    fn test_imei_forms_agree_on_leading_zeros() {
        let parsed: Imei = "012345678901234".parse().unwrap();
        let numeric = Imei::new(12_345_678_901_234).unwrap();
        assert_eq!(parsed, numeric);
        assert_eq!(numeric.as_str(), "012345678901234");
        assert_eq!(Imei::new(0).unwrap().as_str(), "000000000000000");
    }

    #[test]
    fn test_activity_labels() {
        assert_eq!("ON_BICYCLE".parse::<Activity>().unwrap(), Activity::OnBicycle);
        assert_eq!(
            "STANDING".parse::<Activity>(),
            Err(RecomError::UnknownActivity("STANDING".to_string()))
        );
        for activity in Activity::ALL {
            assert_eq!(activity.label().parse::<Activity>().unwrap(), activity);
        }
        assert_eq!(serde_json::to_string(&Activity::InVehicle).unwrap(), "\"IN_VEHICLE\"");
    }

    #[test]
    fn test_activity_distance_is_antisymmetric() {
        for a in Activity::ALL {
            assert_eq!(distance_activities(a, a), 0);
            for b in Activity::ALL {
                assert_eq!(distance_activities(a, b), -distance_activities(b, a));
            }
        }
        assert_eq!(distance_activities(Activity::Still, Activity::InVehicle), 3);
        assert_eq!(distance_activities(Activity::OnBicycle, Activity::OnFoot), -1);
    }

    #[test]
    fn test_timestamp_distance_is_signed() {
        let earlier = parse_timestamp("2015-03-01 12:00:00").unwrap();
        let later = parse_timestamp("2015-03-01 12:30:15").unwrap();
        assert_eq!(distance_timestamps(earlier, later), Duration::seconds(1815));
        assert_eq!(distance_timestamps(later, earlier), Duration::seconds(-1815));
        assert!(parse_timestamp("01/03/2015 12:00").is_err());
    }

    #[test]
    fn test_antipodal_locations_fail_the_comparison() {
        let here = state("123456789012345", Activity::Still, "0,0", "2015-03-01 12:00:00");
        let there = state("123456789012345", Activity::Still, "0,180", "2015-03-01 12:00:00");
        assert!(matches!(
            distance_locations(here.location(), there.location()),
            Err(RecomError::NoConvergence(_, _))
        ));
        assert!(matches!(
            distance_user_states(&here, &there, &Gazetteer::new()),
            Err(RecomError::NoConvergence(_, _))
        ));
    }

    #[test]
    fn test_distance_user_states_has_all_metrics() {
        let a = state("123456789012345", Activity::Still, "0.0,0.0", "2015-03-01 12:00:00");
        let b = state("234567890123456", Activity::OnFoot, "0.0,1.0", "2015-03-01 12:01:00");

        let distance = a.distance(&b, &Gazetteer::new()).unwrap();
        assert!((distance.location - 111_319.49).abs() < 0.01);
        assert_eq!(distance.activity, 1);
        assert_eq!(distance.time, Duration::minutes(1));
        assert_eq!(distance.song.distance_genre, 0.0);

        let json = serde_json::to_value(&distance).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        for key in ["location", "activity", "song", "time"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["time"], 60);
    }
}
