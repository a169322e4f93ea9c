// crates/geofilter-core/tests/filtering.rs

use geofilter_core::testing::{candidate, MockGeocoder, MockLocationSource};
use geofilter_core::{
    City, Coordinate, DeviceFix, DeviceLocator, FilterMode, FilterSession, GeoConfig, GeoError,
    GeocodeCache, PlaceComponent,
};

const TLV: Coordinate = Coordinate::new(32.0853, 34.7818);

fn config() -> GeoConfig {
    GeoConfig::from_json_str(r#"{ "min_default_radius_km": 8 }"#).unwrap()
}

#[tokio::test]
async fn device_fix_feeds_distance_mode() {
    let config = config();
    let locator = DeviceLocator::new(MockLocationSource::at(TLV), &config);
    let mut session = FilterSession::new(&config).with_work_areas(vec![City::new("Haifa")]);

    let DeviceFix::Located { coordinate, in_region } = locator.locate().await else {
        panic!("expected a fix");
    };
    assert!(in_region);

    let filter = session.set_device_location(coordinate);
    assert_eq!(filter.mode, FilterMode::DeviceLocationWithDistance);
    assert_eq!(filter.radius_km, Some(8.0));
    assert_eq!(filter.coordinate, Some(TLV));
}

#[tokio::test]
async fn denied_device_leaves_work_areas_in_place() {
    let config = config();
    let locator = DeviceLocator::new(
        MockLocationSource::failing(|| GeoError::PermissionDenied("user said no".into())),
        &config,
    );
    let session = FilterSession::new(&config).with_work_areas(vec![City::new("Haifa")]);

    let fix = locator.locate().await;
    assert_eq!(fix.coordinate(), None);
    assert_eq!(session.config().mode, FilterMode::WorkAreas);
}

#[tokio::test]
async fn geocoded_city_enables_city_proximity() {
    let config = config();
    let geocoder = MockGeocoder::new().with_forward(
        "Tel Aviv",
        candidate(
            "Tel Aviv-Yafo, Israel",
            Some(TLV),
            vec![PlaceComponent::new("Tel Aviv-Yafo", &["locality", "political"])],
        ),
    );
    let cache = GeocodeCache::new(geocoder, &config);
    let mut session = FilterSession::new(&config);

    session.set_radius("15");
    assert_eq!(session.select_city("Tel Aviv", None).mode, FilterMode::AllCountry);

    let point = cache.forward("Tel Aviv").await.into_value().expect("found").coordinate;
    let filter = session.set_city_coordinate(Some(point));
    assert_eq!(filter.mode, FilterMode::CityWithCoordinates);
    assert_eq!(filter.city, Some(City::new("Tel Aviv")));
    assert_eq!(filter.radius_km, Some(15.0));
}

#[test]
fn country_wide_beats_work_areas() {
    let mut session = FilterSession::new(&config())
        .with_work_areas(vec![City::new("Haifa"), City::new("Acre")]);
    assert_eq!(session.config().mode, FilterMode::WorkAreas);
    let filter = session.set_country_wide(true);
    assert_eq!(filter.mode, FilterMode::AllCountry);
    assert!(filter.area_restriction.is_empty());
}
