// crates/geofilter-core/src/session.rs

//! Companion actions around the resolver.
//!
//! [`FilterSession`] owns the inputs a UI edits and re-resolves after every
//! change. UI-level defaults live here, never in the resolver: when a
//! location source is chosen while no radius is set, the radius defaults to
//! the configured minimum so proximity filtering is always well-defined.

use crate::common::{City, Coordinate};
use crate::config::GeoConfig;
use crate::coords::CoordinateValidator;
use crate::resolver::{FilterConfig, FilterInputs, FilteringModeResolver};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FilterSession {
    inputs: FilterInputs,
    resolver: FilteringModeResolver,
    min_default_radius_km: f64,
}

impl FilterSession {
    pub fn new(config: &GeoConfig) -> Self {
        Self {
            inputs: FilterInputs::default(),
            resolver: FilteringModeResolver::new(CoordinateValidator::new(config.region)),
            min_default_radius_km: config.min_default_radius_km,
        }
    }

    pub fn with_work_areas(mut self, cities: Vec<City>) -> Self {
        self.inputs.work_area_cities = cities;
        self
    }

    pub fn inputs(&self) -> &FilterInputs {
        &self.inputs
    }

    pub fn config(&self) -> FilterConfig {
        self.resolver.resolve(&self.inputs)
    }

    /// Select a city; `coordinate` may arrive now or later through
    /// [`set_city_coordinate`](Self::set_city_coordinate).
    pub fn select_city(&mut self, name: &str, coordinate: Option<Coordinate>) -> FilterConfig {
        self.inputs.selected_city = name.trim().to_string();
        self.inputs.selected_city_coordinate = coordinate;
        self.config()
    }

    pub fn set_city_coordinate(&mut self, coordinate: Option<Coordinate>) -> FilterConfig {
        self.inputs.selected_city_coordinate = coordinate;
        self.config()
    }

    pub fn clear_city(&mut self) -> FilterConfig {
        self.inputs.selected_city.clear();
        self.inputs.selected_city_coordinate = None;
        self.config()
    }

    /// Use the device position as location source. Enables proximity.
    pub fn set_device_location(&mut self, coordinate: Coordinate) -> FilterConfig {
        self.inputs.device_location = Some(coordinate);
        self.enable_proximity()
    }

    pub fn clear_device_location(&mut self) -> FilterConfig {
        self.inputs.device_location = None;
        self.config()
    }

    /// Switch to distance filtering, defaulting the radius if none is set.
    pub fn enable_proximity(&mut self) -> FilterConfig {
        if self.inputs.radius_km().is_none() {
            debug!(radius_km = self.min_default_radius_km, "defaulting search radius");
            self.inputs.distance_radius = Some(format_radius(self.min_default_radius_km));
        }
        self.config()
    }

    pub fn disable_proximity(&mut self) -> FilterConfig {
        self.clear_radius()
    }

    /// Radius as typed by the user.
    pub fn set_radius(&mut self, radius: &str) -> FilterConfig {
        self.inputs.distance_radius = Some(radius.to_string());
        self.config()
    }

    pub fn clear_radius(&mut self) -> FilterConfig {
        self.inputs.distance_radius = None;
        self.config()
    }

    pub fn set_work_areas(&mut self, cities: Vec<City>) -> FilterConfig {
        self.inputs.work_area_cities = cities;
        self.config()
    }

    /// Country-wide override. Turning it on is authoritative: the selected
    /// city, its coordinate and the radius are cleared. The device location
    /// is kept but stays inert until a radius is set again.
    pub fn set_country_wide(&mut self, enabled: bool) -> FilterConfig {
        self.inputs.country_wide = enabled;
        if enabled {
            self.inputs.selected_city.clear();
            self.inputs.selected_city_coordinate = None;
            self.inputs.distance_radius = None;
        }
        self.config()
    }
}

fn format_radius(km: f64) -> String {
    if km.fract() == 0.0 {
        format!("{km:.0}")
    } else {
        km.to_string()
    }
}
