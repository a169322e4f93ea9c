// crates/geofilter-core/src/coords.rs

//! # Coordinate validation and distance math
//!
//! Two levels of validity exist:
//! - **valid**: both values are finite and inside `[-90, 90]` × `[-180, 180]`.
//! - **in region**: valid *and* inside the configured [`BoundingBox`].

use crate::common::{Coordinate, DistanceUnit};
use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Mean Earth radius (IUGG) in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Below this many kilometres distances are always rendered in metres.
const METRES_THRESHOLD_KM: f64 = 0.1;

/// Rectangular lat/lng region describing the supported service area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Israel including the Golan Heights and Eilat.
    pub const ISRAEL: BoundingBox = BoundingBox {
        min_lat: 29.45,
        max_lat: 33.35,
        min_lng: 34.2,
        max_lng: 35.9,
    };

    /// Inclusive containment check.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }

    /// A box is usable when its bounds are finite, ordered and on the globe.
    pub fn check(&self) -> Result<()> {
        let values = [self.min_lat, self.max_lat, self.min_lng, self.max_lng];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeoError::Config("bounding box has non-finite bounds".into()));
        }
        if self.min_lat > self.max_lat || self.min_lng > self.max_lng {
            return Err(GeoError::Config(format!(
                "bounding box bounds are inverted: {self:?}"
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 || self.min_lng < -180.0 || self.max_lng > 180.0 {
            return Err(GeoError::Config(format!(
                "bounding box exceeds the globe: {self:?}"
            )));
        }
        Ok(())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::ISRAEL
    }
}

/// Numeric, range and region checks for coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateValidator {
    region: BoundingBox,
}

impl CoordinateValidator {
    pub fn new(region: BoundingBox) -> Self {
        Self { region }
    }

    pub fn region(&self) -> &BoundingBox {
        &self.region
    }

    /// Fails if either value is not finite or lies outside the valid range.
    ///
    /// # Examples
    /// ```rust
    /// use geofilter_core::CoordinateValidator;
    ///
    /// let v = CoordinateValidator::default();
    /// assert!(v.validate(32.08, 34.78).is_ok());
    /// assert!(v.validate(91.0, 0.0).is_err());
    /// assert!(v.validate(f64::NAN, 0.0).is_err());
    /// ```
    pub fn validate(&self, lat: f64, lng: f64) -> Result<Coordinate> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(GeoError::InvalidInput(format!(
                "coordinate must be finite, got {lat},{lng}"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidInput(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::InvalidInput(format!(
                "longitude {lng} outside [-180, 180]"
            )));
        }
        Ok(Coordinate::new(lat, lng))
    }

    /// [`validate`](Self::validate), then require the point to be inside the
    /// configured region.
    pub fn validate_region(&self, lat: f64, lng: f64) -> Result<Coordinate> {
        let coord = self.validate(lat, lng)?;
        if !self.region.contains(lat, lng) {
            return Err(GeoError::RegionMismatch { lat, lng });
        }
        Ok(coord)
    }

    pub fn is_valid(&self, coord: &Coordinate) -> bool {
        self.validate(coord.lat, coord.lng).is_ok()
    }

    pub fn is_in_region(&self, coord: &Coordinate) -> bool {
        self.validate_region(coord.lat, coord.lng).is_ok()
    }

    /// Validates coordinates arriving as text (form fields, query strings).
    pub fn parse(&self, lat: &str, lng: &str) -> Result<Coordinate> {
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| GeoError::InvalidInput(format!("'{}' is not a number", v.trim())))
        };
        self.validate(parse(lat)?, parse(lng)?)
    }
}

impl Default for CoordinateValidator {
    fn default() -> Self {
        Self::new(BoundingBox::default())
    }
}

/// Great-circle distance in kilometres (haversine, mean Earth radius).
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two coordinates in kilometres.
pub fn distance_between(a: &Coordinate, b: &Coordinate) -> f64 {
    haversine_km(a.lat, a.lng, b.lat, b.lng)
}

/// Render a distance for display.
///
/// Metres (rounded to the nearest integer) when `unit` is [`DistanceUnit::M`]
/// or the distance is under 100 m; otherwise kilometres at `precision`
/// decimals.
///
/// ```rust
/// use geofilter_core::{format_distance, DistanceUnit};
///
/// assert_eq!(format_distance(0.0456, DistanceUnit::Km, 1), "46 m");
/// assert_eq!(format_distance(2.345, DistanceUnit::Km, 1), "2.3 km");
/// assert_eq!(format_distance(2.345, DistanceUnit::M, 1), "2345 m");
/// ```
pub fn format_distance(km: f64, unit: DistanceUnit, precision: usize) -> String {
    if unit == DistanceUnit::M || km < METRES_THRESHOLD_KM {
        format!("{} m", (km * 1000.0).round() as i64)
    } else {
        format!("{km:.precision$} km")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEL_AVIV: (f64, f64) = (32.0853, 34.7818);
    const JERUSALEM: (f64, f64) = (31.7683, 35.2137);

    #[test]
    fn validate_accepts_the_closed_range() {
        let v = CoordinateValidator::default();
        for (lat, lng) in [(90.0, 180.0), (-90.0, -180.0), (0.0, 0.0), (45.5, -120.25)] {
            assert!(v.validate(lat, lng).is_ok(), "{lat},{lng}");
        }
    }

    #[test]
    fn validate_rejects_out_of_range_and_non_finite() {
        let v = CoordinateValidator::default();
        for (lat, lng) in [
            (90.0001, 0.0),
            (-90.5, 0.0),
            (0.0, 180.01),
            (0.0, -181.0),
            (f64::NAN, 0.0),
            (0.0, f64::INFINITY),
        ] {
            let err = v.validate(lat, lng).unwrap_err();
            assert_eq!(err.kind(), crate::ErrorKind::InvalidInput, "{lat},{lng}");
        }
    }

    #[test]
    fn validate_region_distinguishes_out_of_coverage() {
        let v = CoordinateValidator::default();
        assert!(v.validate_region(TEL_AVIV.0, TEL_AVIV.1).is_ok());
        // Munich: valid but far outside.
        let err = v.validate_region(48.137, 11.575).unwrap_err();
        assert!(matches!(err, GeoError::RegionMismatch { .. }));
        // Out of range wins over region.
        let err = v.validate_region(100.0, 34.0).unwrap_err();
        assert!(matches!(err, GeoError::InvalidInput(_)));
    }

    #[test]
    fn parse_validates_text_input() {
        let v = CoordinateValidator::default();
        assert_eq!(
            v.parse(" 32.08", "34.78 ").unwrap(),
            Coordinate::new(32.08, 34.78)
        );
        assert!(v.parse("abc", "34.78").is_err());
        assert!(v.parse("-95", "34.78").is_err());
    }

    #[test]
    fn haversine_is_zero_on_identity_and_symmetric() {
        assert_eq!(haversine_km(TEL_AVIV.0, TEL_AVIV.1, TEL_AVIV.0, TEL_AVIV.1), 0.0);
        let ab = haversine_km(TEL_AVIV.0, TEL_AVIV.1, JERUSALEM.0, JERUSALEM.1);
        let ba = haversine_km(JERUSALEM.0, JERUSALEM.1, TEL_AVIV.0, TEL_AVIV.1);
        assert!((ab - ba).abs() < 1e-9);
        // Roughly 54 km as the crow flies.
        assert!(ab > 50.0 && ab < 58.0, "{ab}");
    }

    #[test]
    fn haversine_handles_antipodes() {
        let d = haversine_km(0.0, 0.0, 0.0, 180.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn format_distance_switches_units() {
        assert_eq!(format_distance(0.0999, DistanceUnit::Km, 2), "100 m");
        assert_eq!(format_distance(0.1, DistanceUnit::Km, 2), "0.10 km");
        assert_eq!(format_distance(12.0, DistanceUnit::Km, 0), "12 km");
        assert_eq!(format_distance(1.2344, DistanceUnit::M, 3), "1234 m");
    }

    #[test]
    fn bounding_box_check_rejects_bad_boxes() {
        assert!(BoundingBox::ISRAEL.check().is_ok());
        let inverted = BoundingBox { min_lat: 10.0, max_lat: 5.0, ..BoundingBox::ISRAEL };
        assert!(inverted.check().is_err());
        let off_globe = BoundingBox { max_lng: 200.0, ..BoundingBox::ISRAEL };
        assert!(off_globe.check().is_err());
    }
}
