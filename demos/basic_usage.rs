//! Basic usage example for geofilter-rs
//!
//! This example demonstrates how to:
//! - Extract a city from free text and from geocoder components
//! - Validate coordinates and measure distances
//! - Memoize geocoding lookups (with an in-memory provider)

use geofilter_rs::prelude::*;
use geofilter_rs::testing::{candidate, MockGeocoder};
use geofilter_rs::{distance_between, format_distance};

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== geofilter-rs Basic Usage Example ===\n");

    // Example 1: City from free text
    println!("--- Example 1: City from free text ---");
    let extractor = CityExtractor::default();
    for address in [
        "123 Ben Gurion St, Tel Aviv, Israel",
        "רחוב הרצל 10, חיפה",
        "5 Main Rd, Springfield, Israel",
        "   ",
    ] {
        let extraction = extractor.from_text_detailed(address);
        println!("{address:?} -> {} ({:?})", extraction.city, extraction.source);
    }
    println!();

    // Example 2: City from structured components
    println!("--- Example 2: City from geocoder components ---");
    let components = vec![
        PlaceComponent::new("Israel", &["country", "political"]),
        PlaceComponent::new("Haifa District", &["administrative_area_level_1", "political"]),
        PlaceComponent::new("Haifa", &["locality", "political"]),
    ];
    println!("City: {}\n", extractor.from_components(&components, None));

    // Example 3: Validation and distance
    println!("--- Example 3: Validation and distance ---");
    let validator = CoordinateValidator::default();
    let tel_aviv = validator.validate(32.0853, 34.7818)?;
    let jerusalem = validator.validate(31.7683, 35.2137)?;
    match validator.validate_region(51.5074, -0.1278) {
        Ok(c) => println!("London accepted?! {c}"),
        Err(e) => println!("London rejected: {e}"),
    }
    let km = distance_between(&tel_aviv, &jerusalem);
    println!("Tel Aviv -> Jerusalem: {}", format_distance(km, DistanceUnit::Km, 1));
    println!("Across the street: {}\n", format_distance(0.042, DistanceUnit::Km, 1));

    // Example 4: Memoized geocoding
    println!("--- Example 4: Memoized geocoding ---");
    let provider = MockGeocoder::new().with_forward(
        "Dizengoff 50, Tel Aviv",
        candidate(
            "Dizengoff St 50, Tel Aviv-Yafo, Israel",
            Some(Coordinate::new(32.0775, 34.7747)),
            vec![PlaceComponent::new("Tel Aviv-Yafo", &["locality", "political"])],
        ),
    );
    let cache = GeocodeCache::new(provider.clone(), &GeoConfig::default());
    for query in ["Dizengoff 50, Tel Aviv", "  DIZENGOFF 50, tel aviv "] {
        match cache.forward(query).await {
            Lookup::Found { value, cached } => {
                println!("{query:?} -> {} in {} (cached: {cached})", value.coordinate, value.city)
            }
            Lookup::Missing { kind, .. } => println!("{query:?} -> no result ({kind:?})"),
            Lookup::Superseded => println!("{query:?} -> superseded"),
        }
    }
    println!("Provider calls: {}", provider.call_count());

    Ok(())
}
