// crates/geofilter-core/src/resolver.rs

//! # Filtering mode resolution
//!
//! A pure function from the current location inputs to one [`FilterConfig`].
//! Modes are tried in a fixed order and the first that matches wins:
//!
//! 1. [`FilterMode::CityWithCoordinates`]: city, radius and a valid city coordinate
//! 2. [`FilterMode::DeviceLocationWithDistance`]: radius and a valid device location
//! 3. [`FilterMode::CityOnly`]: city without radius
//! 4. [`FilterMode::WorkAreas`]: no override, work areas configured, no city, no radius
//! 5. [`FilterMode::AllCountry`]: everything else
//!
//! Nothing carries over between evaluations; the same inputs always give the
//! same output.

use crate::common::{City, Coordinate};
use crate::coords::CoordinateValidator;
use crate::text::parse_positive_f64;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    CityWithCoordinates,
    DeviceLocationWithDistance,
    CityOnly,
    WorkAreas,
    AllCountry,
}

impl FilterMode {
    /// Modes that filter by distance from a point.
    pub fn is_proximity(self) -> bool {
        matches!(
            self,
            FilterMode::CityWithCoordinates | FilterMode::DeviceLocationWithDistance
        )
    }
}

/// Everything the resolver looks at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterInputs {
    /// Possibly empty.
    pub selected_city: String,
    /// Set once the selected city was resolved to a point.
    pub selected_city_coordinate: Option<Coordinate>,
    pub device_location: Option<Coordinate>,
    /// Kilometres as typed; blank, non-numeric or non-positive means "not set".
    pub distance_radius: Option<String>,
    pub work_area_cities: Vec<City>,
    pub country_wide: bool,
}

impl FilterInputs {
    pub fn has_city(&self) -> bool {
        !self.selected_city.trim().is_empty()
    }

    pub fn radius_km(&self) -> Option<f64> {
        parse_positive_f64(self.distance_radius.as_deref())
    }
}

/// The effective filter handed to the listings query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterConfig {
    pub mode: FilterMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_km: Option<f64>,
    /// Non-empty only in [`FilterMode::WorkAreas`].
    pub area_restriction: Vec<City>,
}

impl FilterConfig {
    fn new(mode: FilterMode) -> Self {
        Self {
            mode,
            city: None,
            coordinate: None,
            radius_km: None,
            area_restriction: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilteringModeResolver {
    validator: CoordinateValidator,
}

impl FilteringModeResolver {
    pub fn new(validator: CoordinateValidator) -> Self {
        Self { validator }
    }

    /// Select the mode and build the effective filter.
    ///
    /// ```rust
    /// use geofilter_core::{Coordinate, FilterInputs, FilterMode, FilteringModeResolver};
    ///
    /// let inputs = FilterInputs {
    ///     selected_city: "Tel Aviv".into(),
    ///     selected_city_coordinate: Some(Coordinate::new(32.08, 34.78)),
    ///     distance_radius: Some("10".into()),
    ///     ..Default::default()
    /// };
    /// let config = FilteringModeResolver::default().resolve(&inputs);
    /// assert_eq!(config.mode, FilterMode::CityWithCoordinates);
    /// assert!(config.area_restriction.is_empty());
    /// ```
    pub fn resolve(&self, inputs: &FilterInputs) -> FilterConfig {
        let has_city = inputs.has_city();
        let radius = inputs.radius_km();
        let city_point = self.valid(inputs.selected_city_coordinate);
        let device_point = self.valid(inputs.device_location);

        let config = match (has_city, radius, city_point, device_point) {
            (true, Some(radius), Some(point), _) => FilterConfig {
                city: Some(City::new(&inputs.selected_city)),
                coordinate: Some(point),
                radius_km: Some(radius),
                ..FilterConfig::new(FilterMode::CityWithCoordinates)
            },
            (_, Some(radius), _, Some(point)) => FilterConfig {
                coordinate: Some(point),
                radius_km: Some(radius),
                ..FilterConfig::new(FilterMode::DeviceLocationWithDistance)
            },
            (true, None, _, _) => FilterConfig {
                city: Some(City::new(&inputs.selected_city)),
                ..FilterConfig::new(FilterMode::CityOnly)
            },
            (false, None, _, _)
                if !inputs.country_wide && !inputs.work_area_cities.is_empty() =>
            {
                FilterConfig {
                    area_restriction: inputs.work_area_cities.clone(),
                    ..FilterConfig::new(FilterMode::WorkAreas)
                }
            }
            _ => FilterConfig::new(FilterMode::AllCountry),
        };

        trace!(mode = ?config.mode, "resolved filtering mode");
        config
    }

    /// A coordinate counts as present only once it validates.
    fn valid(&self, coordinate: Option<Coordinate>) -> Option<Coordinate> {
        coordinate.filter(|c| self.validator.is_valid(c))
    }
}

/// [`FilteringModeResolver::resolve`] with the default validator.
pub fn resolve(inputs: &FilterInputs) -> FilterConfig {
    FilteringModeResolver::default().resolve(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TLV: Coordinate = Coordinate::new(32.08, 34.78);
    const DEVICE: Coordinate = Coordinate::new(32.79, 34.99);

    fn cities(names: &[&str]) -> Vec<City> {
        names.iter().map(|n| City::new(n)).collect()
    }

    #[test]
    fn city_with_coordinates_example() {
        let config = resolve(&FilterInputs {
            selected_city: "Tel Aviv".into(),
            selected_city_coordinate: Some(TLV),
            distance_radius: Some("10".into()),
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::CityWithCoordinates);
        assert_eq!(config.city, Some(City::new("Tel Aviv")));
        assert_eq!(config.coordinate, Some(TLV));
        assert_eq!(config.radius_km, Some(10.0));
        assert!(config.area_restriction.is_empty());
    }

    #[test]
    fn work_areas_example() {
        let config = resolve(&FilterInputs {
            selected_city: "".into(),
            distance_radius: Some("".into()),
            work_area_cities: cities(&["Haifa", "Acre"]),
            country_wide: false,
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::WorkAreas);
        assert_eq!(config.area_restriction, cities(&["Haifa", "Acre"]));
        assert_eq!(config.city, None);
    }

    #[test]
    fn city_coordinate_beats_device_location() {
        let config = resolve(&FilterInputs {
            selected_city: "Tel Aviv".into(),
            selected_city_coordinate: Some(TLV),
            device_location: Some(DEVICE),
            distance_radius: Some("5".into()),
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::CityWithCoordinates);
        assert_eq!(config.coordinate, Some(TLV));
    }

    #[test]
    fn device_location_with_distance() {
        let config = resolve(&FilterInputs {
            device_location: Some(DEVICE),
            distance_radius: Some(" 7.5 ".into()),
            work_area_cities: cities(&["Haifa"]),
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::DeviceLocationWithDistance);
        assert_eq!(config.coordinate, Some(DEVICE));
        assert_eq!(config.radius_km, Some(7.5));
        assert_eq!(config.city, None);
        assert!(config.area_restriction.is_empty());
    }

    #[test]
    fn city_pending_coordinate_falls_back_to_device() {
        let config = resolve(&FilterInputs {
            selected_city: "Haifa".into(),
            device_location: Some(DEVICE),
            distance_radius: Some("3".into()),
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::DeviceLocationWithDistance);
    }

    #[test]
    fn invalid_coordinates_count_as_absent() {
        let config = resolve(&FilterInputs {
            selected_city: "Haifa".into(),
            selected_city_coordinate: Some(Coordinate::new(f64::NAN, 34.0)),
            device_location: Some(Coordinate::new(95.0, 34.0)),
            distance_radius: Some("3".into()),
            ..Default::default()
        });
        // City set, radius set, no valid point: nothing proximity-based applies.
        assert_eq!(config.mode, FilterMode::AllCountry);
        assert_eq!(config.coordinate, None);
    }

    #[test]
    fn city_only_without_radius() {
        let config = resolve(&FilterInputs {
            selected_city: "Haifa".into(),
            selected_city_coordinate: Some(DEVICE),
            device_location: Some(TLV),
            work_area_cities: cities(&["Acre"]),
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::CityOnly);
        assert_eq!(config.city, Some(City::new("Haifa")));
        assert_eq!(config.coordinate, None);
        assert!(config.area_restriction.is_empty());
    }

    #[test]
    fn unparseable_radius_is_not_set() {
        let config = resolve(&FilterInputs {
            selected_city: "Haifa".into(),
            selected_city_coordinate: Some(DEVICE),
            distance_radius: Some("far".into()),
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::CityOnly);
    }

    #[test]
    fn override_disables_work_areas() {
        let config = resolve(&FilterInputs {
            work_area_cities: cities(&["Haifa"]),
            country_wide: true,
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::AllCountry);
        assert!(config.area_restriction.is_empty());
    }

    #[test]
    fn radius_without_location_blocks_work_areas() {
        let config = resolve(&FilterInputs {
            distance_radius: Some("10".into()),
            work_area_cities: cities(&["Haifa"]),
            ..Default::default()
        });
        assert_eq!(config.mode, FilterMode::AllCountry);
    }

    #[test]
    fn empty_inputs_mean_all_country() {
        let config = resolve(&FilterInputs::default());
        assert_eq!(config, FilterConfig::new(FilterMode::AllCountry));
    }

    #[test]
    fn resolution_is_referentially_pure() {
        let resolver = FilteringModeResolver::default();
        let inputs = FilterInputs {
            selected_city: "Tel Aviv".into(),
            selected_city_coordinate: Some(TLV),
            device_location: Some(DEVICE),
            distance_radius: Some("10".into()),
            work_area_cities: cities(&["Haifa", "Acre"]),
            country_wide: false,
        };
        let first = resolver.resolve(&inputs);
        for _ in 0..5 {
            assert_eq!(resolver.resolve(&inputs.clone()), first);
        }
    }

    #[test]
    fn config_serializes_in_snake_case() {
        let json = serde_json::to_value(resolve(&FilterInputs {
            work_area_cities: cities(&["Haifa"]),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(json["mode"], "work_areas");
        assert_eq!(json["area_restriction"][0], "Haifa");
        assert!(json.get("city").is_none());
    }
}
