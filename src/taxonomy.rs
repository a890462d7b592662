//! # Genre & Style Taxonomy
//!
//! Closed categorical domains for catalog metadata. Genres form a small
//! fixed enumeration; styles are a larger, fixed vocabulary. Both map
//! each category onto a point of the sensMe plane so that two categories
//! can be compared by Euclidean distance.
//!
//! ## Unknown Values
//!
//! Catalog entries frequently lack a genre or a style. Labels equal to
//! `unknown` or `None` (any case), or empty labels, parse to `None`.
//! Any distance involving an unknown side is [`UNKNOWN_DISTANCE`].
//!
//! Every other label must match a table entry exactly: `"rock"` is not
//! the genre `"Rock"`.
//!
//! ## Coordinates
//!
//! Every category currently sits at [`SensMe::ORIGIN`]; the tables exist
//! so that coordinates can be assigned per category without touching the
//! distance code.

use crate::error::{RecomError, Result};
use crate::sens_me::SensMe;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Distance reported when either side of a categorical comparison is unknown.
pub const UNKNOWN_DISTANCE: f64 = -1.0;

/// Label used when rendering an unknown category.
pub const UNKNOWN_LABEL: &str = "unknown";

/// A category with a position in the sensMe plane.
pub trait Category: Copy {
    fn sens_me(&self) -> SensMe;
}

/// True for labels that stand for "no value".
#[must_use]
pub fn is_unknown_label(label: &str) -> bool {
    let label = label.trim();
    label.is_empty() || label.eq_ignore_ascii_case(UNKNOWN_LABEL) || label.eq_ignore_ascii_case("none")
}

/// Distance between two optional categories.
///
/// Returns [`UNKNOWN_DISTANCE`] if either side is `None`.
#[must_use]
pub fn category_distance<C: Category>(first: Option<C>, second: Option<C>) -> f64 {
    match (first, second) {
        (Some(a), Some(b)) => a.sens_me().distance(&b.sens_me()),
        _ => UNKNOWN_DISTANCE,
    }
}

/// Top-level musical genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Genre {
    Rock,
    Pop,
    Electronic,
    HipHop,
    FunkSoul,
    Jazz,
    FolkWorldCountry,
    NonMusic,
    StageAndScreen,
    Reggae,
    Latin,
    Classical,
    Blues,
    Childrens,
    BrassAndMilitary,
}

const GENRE_TABLE: [(Genre, &str, SensMe); 15] = [
    (Genre::Rock, "Rock", SensMe::ORIGIN),
    (Genre::Pop, "Pop", SensMe::ORIGIN),
    (Genre::Electronic, "Electronic", SensMe::ORIGIN),
    (Genre::HipHop, "Hip Hop", SensMe::ORIGIN),
    (Genre::FunkSoul, "Funk/Soul", SensMe::ORIGIN),
    (Genre::Jazz, "Jazz", SensMe::ORIGIN),
    (Genre::FolkWorldCountry, "Folk/World/Country", SensMe::ORIGIN),
    (Genre::NonMusic, "Non-Music", SensMe::ORIGIN),
    (Genre::StageAndScreen, "Stage & Screen", SensMe::ORIGIN),
    (Genre::Reggae, "Reggae", SensMe::ORIGIN),
    (Genre::Latin, "Latin", SensMe::ORIGIN),
    (Genre::Classical, "Classical", SensMe::ORIGIN),
    (Genre::Blues, "Blues", SensMe::ORIGIN),
    (Genre::Childrens, "Children's", SensMe::ORIGIN),
    (Genre::BrassAndMilitary, "Brass & Military", SensMe::ORIGIN),
];

/// Recognized style labels. All styles sit at the sensMe origin for now.
const STYLE_LABELS: &[&str] = &[
    "Soundtrack", "Score", "Modern Classical", "Synth-pop", "Ambient", "Experimental",
    "Disco", "Pop Rock", "Theme", "Downtempo", "Abstract", "Electro", "Alternative Rock",
    "House", "Industrial", "Easy Listening", "Techno", "Contemporary", "Ballad",
    "Dark Ambient", "Funk", "Minimal", "New Wave", "Indie Rock", "Breakbeat", "Soft Rock",
    "Leftfield", "Prog Rock", "New Age", "Soul", "Hip Hop", "Vocal", "Breaks",
    "Psychedelic Rock", "Trip Hop", "Musique Concrète", "Avantgarde", "Musical",
    "Rock & Roll", "Classic Rock", "Noise", "RnB/Swing", "Heavy Metal", "Classical",
    "Contemporary Jazz", "Hard Rock", "Drum n Bass", "Trance", "Jazz-Funk", "Drone",
    "Italo-Disco", "Europop", "Art Rock", "Euro House", "Pop Rap", "Folk Rock", "Punk",
    "Big Beat", "Spoken Word", "Chanson", "Folk", "Acoustic", "Tribal", "Chiptune", "IDM",
    "Lounge", "Bollywood", "Country Rock", "Future Jazz", "Rhythm & Blues", "Hindustani",
    "Krautrock", "Smooth Jazz", "Hi NRG", "Latin", "Blues Rock", "Dub", "Nu Metal",
    "Modern", "Neo-Classical", "Post Rock", "Big Band", "Reggae-Pop", "J-pop", "Fusion",
    "Dialogue", "Arena Rock", "Symphonic Rock", "Progressive House", "Field Recording",
    "Goth Rock", "Illbient", "Brit Pop", "Space-Age", "Jazz-Rock", "Romantic", "Country",
    "Soul-Jazz", "Special Effects", "Instrumental", "Psychedelic", "Novelty",
    "Movie Effects", "Lo-Fi", "Comedy", "Swing", "Darkwave", "Space Rock", "Tech House",
    "Free Improvisation", "Rhythmic Noise", "Schlager", "Acid Jazz", "Parody",
    "Post-Modern", "Acid", "Surf", "Gangsta", "Reggae", "Dubstep", "Ethereal", "Hardcore",
    "Neofolk", "Power Electronics", "Free Jazz", "Deep House", "Glitch",
    "Progressive Trance", "Interview", "Bossa Nova", "EBM", "Freestyle", "Latin Jazz",
    "Rockabilly", "Cool Jazz", "Ska", "Acid House", "Jazzdance", "Medieval",
    "Avant-garde Jazz", "Poetry", "Power Pop", "Glam", "Opera", "Baroque", "Ragga HipHop",
    "Garage Rock", "Hip-House", "Neo-Romantic", "Monolog", "Radioplay", "Broken Beat",
    "Happy Hardcore", "Italodance", "Jungle", "Shoegaze", "Shoegazer", "Thug Rap",
    "Garage House", "African", "Cut-up/DJ", "Afrobeat", "Conscious", "Goa Trance",
    "Post-Punk", "Speech", "Hard House", "Black Metal", "Gospel", "Grunge", "Salsa",
    "Samba", "Story", "Thrash", "Berlin-School", "Electric Blues", "Louisiana Blues",
    "Promotional", "Psy-Trance", "Audiobook", "Bossanova", "Dub Techno", "Nursery Rhymes",
    "Post Bop", "Stoner Rock", "Dancehall", "Emo", "Flamenco", "Celtic", "Cha-Cha",
    "Death Metal", "Mambo", "Political", "Breakcore", "Delta Blues", "Doo Wop",
    "Doom Metal", "Marches", "Music Hall", "Religious", "Afro-Cuban Jazz", "Jazzy Hip-Hop",
    "Mod", "Neo Soul", "UK Garage", "Bluegrass", "Psychobilly", "Tribal House", "Ghetto",
    "Grindcore", "Math Rock", "Modal", "Therapy", "Aboriginal", "Bass Music",
    "Country Blues", "Eurodance", "Funk Metal", "Karaoke", "Bop", "Calypso", "Dixieland",
    "Electro House", "Hard Trance", "New Jack Swing", "Swingbeat", "Technical", "Beat",
    "Bhangra", "Education", "Hardstyle", "Indie Pop", "Ragtime", "Southern Rock", "Tango",
    "Free Funk", "Gabber", "Harmonica Blues", "Impressionist", "Military", "New Beat", "Oi",
    "Zydeco", "Acid Rock", "Afro-Cuban", "Cumbia", "Electroclash", "MPB", "No Wave",
    "Ranchera", "Rumba", "Cajun", "Chinese Classical", "Educational", "Grime",
    "Hardcore Hip-Hop", "Indian Classical", "Ragga", "Renaissance", "Soca", "Speedcore",
    "Batucada", "Bounce", "Cubano", "Euro-Disco", "Gamelan", "Gypsy Jazz", "Hard Bop",
    "Jumpstyle", "Minimal Techno", "Modern Electric Blues", "Nordic", "Norteño",
    "Persian Classical", "Polka", "Reggae Gospel", "Skweee", "Speed Metal", "Steel Band",
    "Tejano", "Bayou Funk", "Brass Band", "Canzone Napoletana", "Crunk", "DJ Battle Tool",
    "Enka", "Gagaku", "Hard Techno", "Hyphy", "Laïkó", "Makina", "Overtone Singing",
    "P.Funk", "Piano Blues", "Public Service Announcement", "Rocksteady", "Roots Reggae",
    "Sermon", "Speed Garage", "Bachata", "Britcore", "Chicago Blues", "Corrido",
    "Deathrock", "Dub Poetry", "Early", "Favela Funk", "Gogo", "Horrorcore", "Klezmer",
    "Korean Court Music", "Lovers Rock", "Metalcore", "Nueva Cancion", "Ottoman Classical",
    "Pachanga", "Pacific", "Philippine Classical", "Pop Punk", "Quechua", "Romani",
    "Schranz", "Screw", "Sámi Music", "Trova", "Viking Metal", "Zouk", "Éntekhno",
];

lazy_static::lazy_static! {
    /// Genre label -> table row
    static ref GENRE_INDEX: HashMap<&'static str, usize> = GENRE_TABLE
        .iter()
        .enumerate()
        .map(|(i, (_, label, _))| (*label, i))
        .collect();

    static ref STYLE_INDEX: HashSet<&'static str> = STYLE_LABELS.iter().copied().collect();
}

impl Genre {
    /// All genres, in table order.
    pub fn all() -> impl Iterator<Item = Genre> {
        GENRE_TABLE.iter().map(|(genre, _, _)| *genre)
    }

    /// Catalog label of this genre.
    #[must_use]
    pub fn label(&self) -> &'static str {
        GENRE_TABLE[self.row()].1
    }

    fn row(&self) -> usize {
        GENRE_TABLE
            .iter()
            .position(|(genre, _, _)| genre == self)
            .unwrap_or_default()
    }

    /// Parses a catalog label, mapping the unknown sentinels to `None`.
    ///
    /// # Errors
    ///
    /// [`RecomError::UnrecognizedGenre`] for labels outside the genre table.
    pub fn parse_label(label: &str) -> Result<Option<Genre>> {
        if is_unknown_label(label) {
            return Ok(None);
        }
        label.parse().map(Some)
    }
}

impl Category for Genre {
    fn sens_me(&self) -> SensMe {
        GENRE_TABLE[self.row()].2
    }
}

impl FromStr for Genre {
    type Err = RecomError;

    fn from_str(s: &str) -> Result<Self> {
        GENRE_INDEX
            .get(s)
            .map(|&row| GENRE_TABLE[row].0)
            .ok_or_else(|| RecomError::UnrecognizedGenre(s.to_string()))
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Genre {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A style from the recognized style vocabulary.
///
/// Only constructible through parsing, so every `Style` value is known
/// to be in the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Style(&'static str);

impl Style {
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.0
    }

    /// Number of recognized styles.
    #[must_use]
    pub fn vocabulary_size() -> usize {
        STYLE_INDEX.len()
    }

    /// Parses a catalog label, mapping the unknown sentinels to `None`.
    ///
    /// # Errors
    ///
    /// [`RecomError::UnrecognizedStyle`] for labels outside the vocabulary.
    pub fn parse_label(label: &str) -> Result<Option<Style>> {
        if is_unknown_label(label) {
            return Ok(None);
        }
        label.parse().map(Some)
    }
}

impl Category for Style {
    fn sens_me(&self) -> SensMe {
        SensMe::ORIGIN
    }
}

impl FromStr for Style {
    type Err = RecomError;

    fn from_str(s: &str) -> Result<Self> {
        STYLE_INDEX
            .get(s)
            .map(|label| Style(*label))
            .ok_or_else(|| RecomError::UnrecognizedStyle(s.to_string()))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Distance between two genre labels in the sensMe plane.
///
/// # Errors
///
/// [`RecomError::UnrecognizedGenre`] if either label is not a genre or an
/// unknown sentinel.
pub fn distance_genres(first: &str, second: &str) -> Result<f64> {
    let first = Genre::parse_label(first)?;
    let second = Genre::parse_label(second)?;
    Ok(category_distance(first, second))
}

/// Distance between two style labels in the sensMe plane.
///
/// # Errors
///
/// [`RecomError::UnrecognizedStyle`] if either label is not a style or an
/// unknown sentinel.
pub fn distance_styles(first: &str, second: &str) -> Result<f64> {
    let first = Style::parse_label(first)?;
    let second = Style::parse_label(second)?;
    Ok(category_distance(first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_genre_distance_is_zero() {
        for genre in Genre::all() {
            assert_eq!(distance_genres(genre.label(), genre.label()).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_unknown_genre_gives_sentinel() {
        assert_eq!(distance_genres("Rock", "None").unwrap(), UNKNOWN_DISTANCE);
        assert_eq!(distance_genres("unknown", "Jazz").unwrap(), UNKNOWN_DISTANCE);
        assert_eq!(distance_genres("", "").unwrap(), UNKNOWN_DISTANCE);
    }

    #[test]
    fn test_unrecognized_genre_fails() {
        assert_eq!(
            distance_genres("Rock", "Polka"),
            Err(RecomError::UnrecognizedGenre("Polka".to_string()))
        );
        assert!(distance_genres("Vaporwave", "unknown").is_err());
    }

    #[test]
    fn test_labels_must_match_exactly() {
        assert_eq!(
            distance_genres("rock", "  ROCK "),
            Err(RecomError::UnrecognizedGenre("rock".to_string()))
        );
        assert!(distance_genres("Rock", " Rock").is_err());
        assert_eq!(
            distance_styles("house", "HOUSE"),
            Err(RecomError::UnrecognizedStyle("house".to_string()))
        );
        // sentinels stay case-insensitive
        assert_eq!(distance_genres("Rock", "NONE").unwrap(), UNKNOWN_DISTANCE);
    }

    #[test]
    fn test_genre_labels_round_trip() {
        for genre in Genre::all() {
            assert_eq!(genre.label().parse::<Genre>().unwrap(), genre);
        }
        assert_eq!("Funk/Soul".parse::<Genre>().unwrap(), Genre::FunkSoul);
        assert_eq!(Genre::Childrens.to_string(), "Children's");
    }

    #[test]
    fn test_style_lookup() {
        assert_eq!("Synth-pop".parse::<Style>().unwrap().label(), "Synth-pop");
        assert_eq!("Musique Concrète".parse::<Style>().unwrap().label(), "Musique Concrète");
        assert_eq!(Style::parse_label("None").unwrap(), None);
        assert!(Style::vocabulary_size() > 300);
    }

    #[test]
    fn test_style_distances() {
        assert_eq!(distance_styles("House", "House").unwrap(), 0.0);
        assert_eq!(distance_styles("House", "Techno").unwrap(), 0.0);
        assert_eq!(distance_styles("House", "unknown").unwrap(), UNKNOWN_DISTANCE);
        assert_eq!(
            distance_styles("Rock", "House"),
            Err(RecomError::UnrecognizedStyle("Rock".to_string()))
        );
    }

    #[test]
    fn test_genre_serializes_as_label() {
        let json = serde_json::to_string(&Genre::StageAndScreen).unwrap();
        assert_eq!(json, "\"Stage & Screen\"");
    }
}
