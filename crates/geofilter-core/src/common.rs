// crates/geofilter-core/src/common.rs

//! Small value types shared by every component.

use crate::error::GeoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reserved placeholder standing in for "no city could be determined".
pub const UNSPECIFIED_CITY: &str = "unspecified";

/// A canonical city name.
///
/// Never empty: constructing a `City` from blank text yields the
/// [`UNSPECIFIED_CITY`] sentinel instead.
///
/// # Examples
/// ```rust
/// use geofilter_core::City;
///
/// assert_eq!(City::new("  Haifa ").as_str(), "Haifa");
/// assert!(City::new("   ").is_unspecified());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct City(String);

impl City {
    pub fn new(name: impl AsRef<str>) -> Self {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            Self::unspecified()
        } else {
            City(trimmed.to_string())
        }
    }

    pub fn unspecified() -> Self {
        City(UNSPECIFIED_CITY.to_string())
    }

    pub fn is_unspecified(&self) -> bool {
        self.0 == UNSPECIFIED_CITY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for City {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for City {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for City {
    fn from(s: &str) -> Self {
        City::new(s)
    }
}

impl From<String> for City {
    fn from(s: String) -> Self {
        City::new(s)
    }
}

/// A latitude/longitude pair in decimal degrees.
///
/// Holding a `Coordinate` does not imply it is valid; run it through
/// [`crate::CoordinateValidator`] first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Accepts `"lat,lng"` with optional whitespace.
impl FromStr for Coordinate {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| GeoError::InvalidInput(format!("expected 'lat,lng', got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| GeoError::InvalidInput(format!("'{}' is not a number: {e}", v.trim())))
        };
        Ok(Coordinate::new(parse(lat)?, parse(lng)?))
    }
}

/// Unit used when rendering a distance for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Km,
    M,
}

impl FromStr for DistanceUnit {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" => Ok(DistanceUnit::Km),
            "m" => Ok(DistanceUnit::M),
            other => Err(GeoError::InvalidInput(format!("unknown distance unit '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_city_becomes_sentinel() {
        assert_eq!(City::new("").as_str(), UNSPECIFIED_CITY);
        assert_eq!(City::default(), City::unspecified());
        assert!(!City::new("Acre").is_unspecified());
    }

    #[test]
    fn coordinate_parses_and_displays_at_six_decimals() {
        let c: Coordinate = " 32.0853 , 34.7818 ".parse().unwrap();
        assert_eq!(c, Coordinate::new(32.0853, 34.7818));
        assert_eq!(c.to_string(), "32.085300,34.781800");
        assert!("32.08".parse::<Coordinate>().is_err());
        assert!("north,34".parse::<Coordinate>().is_err());
    }

    #[test]
    fn distance_unit_parses_case_insensitively() {
        assert_eq!("KM".parse::<DistanceUnit>().unwrap(), DistanceUnit::Km);
        assert_eq!("m".parse::<DistanceUnit>().unwrap(), DistanceUnit::M);
        assert!("miles".parse::<DistanceUnit>().is_err());
    }
}
