//! geofilter-rs
//!
//! Workspace facade over [`geofilter_core`]; hosts the demos.

pub use geofilter_core::*;

/// Everything a search screen typically needs.
pub mod prelude {
    pub use geofilter_core::{
        City, CityExtractor, Coordinate, CoordinateValidator, DeviceFix, DeviceLocator,
        DistanceUnit, FilterConfig, FilterInputs, FilterMode, FilterSession, GeoConfig, GeoError,
        GeocodeCache, Geocoder, LocationSource, Lookup, PlaceComponent, Result,
    };
}
