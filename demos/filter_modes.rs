//! Filtering modes walkthrough
//!
//! Drives a [`FilterSession`] through the actions a search screen would
//! perform and prints the effective filter after each one.

use async_trait::async_trait;
use geofilter_rs::prelude::*;

/// Stands in for the platform geolocation API.
struct FixedPosition(Coordinate);

#[async_trait]
impl LocationSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinate> {
        Ok(self.0)
    }
}

fn show(step: &str, config: &FilterConfig) {
    println!("{step:<38} -> {:?}", config.mode);
    if let Some(city) = &config.city {
        println!("{:<38}    city: {city}", "");
    }
    if let (Some(point), Some(radius)) = (config.coordinate, config.radius_km) {
        println!("{:<38}    within {radius} km of {point}", "");
    }
    if !config.area_restriction.is_empty() {
        let names: Vec<&str> = config.area_restriction.iter().map(City::as_str).collect();
        println!("{:<38}    areas: {}", "", names.join(", "));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== geofilter-rs Filtering Modes ===\n");

    let config = GeoConfig::default();
    let gazetteer = config.gazetteer();
    let mut session = FilterSession::new(&config)
        .with_work_areas(vec![City::new("Haifa"), City::new("Acre")]);

    show("initial state", &session.config());

    let locator = DeviceLocator::new(FixedPosition(Coordinate::new(32.7940, 34.9896)), &config);
    if let DeviceFix::Located { coordinate, .. } = locator.locate().await {
        show("use my location", &session.set_device_location(coordinate));
    }

    show("radius 12 km", &session.set_radius("12"));

    let tel_aviv = gazetteer.lookup("tel aviv").and_then(|e| e.coordinate);
    show("select Tel Aviv", &session.select_city("Tel Aviv", tel_aviv));

    show("clear radius", &session.clear_radius());
    show("clear city", &session.clear_city());
    show("clear device location", &session.clear_device_location());
    show("search whole country", &session.set_country_wide(true));
    show("back to my areas", &session.set_country_wide(false));

    Ok(())
}
