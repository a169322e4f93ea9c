// crates/geofilter-core/src/lib.rs

//! geofilter-core
//! ==============
//!
//! Turns noisy location input (free-text addresses, geocoder responses,
//! device coordinates) into canonical city names and validated coordinates,
//! and decides which proximity-filtering mode a listings query should use.
//!
//! - [`CityExtractor`]: city name from structured components or free text
//! - [`GeocodeCache`]: memoized, cancellable forward/reverse geocoding
//! - [`CoordinateValidator`]: range and region checks, haversine distance
//! - [`FilteringModeResolver`]: pure mode selection from the current inputs
//!
//! ```rust
//! use geofilter_core::{CityExtractor, FilterInputs, FilterMode, City};
//!
//! let extractor = CityExtractor::default();
//! assert_eq!(extractor.from_text("Herzl 10, Haifa, Israel").as_str(), "Haifa");
//!
//! let config = geofilter_core::resolve(&FilterInputs {
//!     work_area_cities: vec![City::new("Haifa"), City::new("Acre")],
//!     ..Default::default()
//! });
//! assert_eq!(config.mode, FilterMode::WorkAreas);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
pub mod city;
pub mod common;
pub mod config;
pub mod coords;
pub mod device;
pub mod error;
pub mod gazetteer;
pub mod geocode;
#[cfg(feature = "json")]
pub mod loader;
pub mod resolver;
pub mod session;
pub mod task;
pub mod testing;
pub mod text;

// Re-exports
pub use crate::cache::{CacheStats, CacheStore, Clock, ManualClock, SystemClock};
pub use crate::city::{CityExtractor, Extraction, ExtractionSource, PlaceComponent};
pub use crate::common::{City, Coordinate, DistanceUnit, UNSPECIFIED_CITY};
pub use crate::config::GeoConfig;
pub use crate::coords::{
    distance_between, format_distance, haversine_km, BoundingBox, CoordinateValidator,
};
pub use crate::device::{DeviceFix, DeviceLocator, LocationSource};
pub use crate::error::{ErrorKind, GeoError, Result};
pub use crate::gazetteer::{Gazetteer, GazetteerEntry};
#[cfg(feature = "http")]
pub use crate::geocode::http::HttpGeocoder;
pub use crate::geocode::{
    ForwardGeocode, ForwardRequest, GeocodeCache, GeocodeCandidate, GeocodeStats, Geocoder,
    Lookup, ReverseGeocode,
};
pub use crate::resolver::{resolve, FilterConfig, FilterInputs, FilterMode, FilteringModeResolver};
pub use crate::session::FilterSession;
pub use crate::task::{TaskHandle, TaskSlot};
