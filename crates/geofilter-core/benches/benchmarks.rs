// crates/geofilter-core/benches/benchmarks.rs

use criterion::{criterion_group, criterion_main, Criterion};
use geofilter_core::{
    haversine_km, resolve, City, CityExtractor, Coordinate, FilterInputs, PlaceComponent,
};
use std::hint::black_box;

fn bench_extraction(c: &mut Criterion) {
    let extractor = CityExtractor::default();
    let addresses = [
        "123 Ben Gurion St, Tel Aviv, Israel",
        "רחוב הרצל 10, חיפה",
        "5 Main Rd, Springfield, 12345, Israel",
        "Unit 4, Industrial Zone North",
    ];
    c.bench_function("city_from_text", |b| {
        b.iter(|| {
            for address in &addresses {
                black_box(extractor.from_text(black_box(address)));
            }
        })
    });

    let components = vec![
        PlaceComponent::new("50", &["street_number"]),
        PlaceComponent::new("Dizengoff Street", &["route"]),
        PlaceComponent::new("Tel Aviv-Yafo", &["locality", "political"]),
        PlaceComponent::new("Israel", &["country", "political"]),
    ];
    c.bench_function("city_from_components", |b| {
        b.iter(|| black_box(extractor.from_components(black_box(&components), None)))
    });
}

fn bench_haversine(c: &mut Criterion) {
    c.bench_function("haversine_km", |b| {
        b.iter(|| haversine_km(black_box(32.0853), black_box(34.7818), black_box(31.7683), black_box(35.2137)))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let inputs = FilterInputs {
        selected_city: "Tel Aviv".into(),
        selected_city_coordinate: Some(Coordinate::new(32.0853, 34.7818)),
        device_location: Some(Coordinate::new(32.7940, 34.9896)),
        distance_radius: Some("10".into()),
        work_area_cities: vec![City::new("Haifa"), City::new("Acre")],
        country_wide: false,
    };
    c.bench_function("resolve_filter_mode", |b| b.iter(|| black_box(resolve(black_box(&inputs)))));
}

criterion_group!(benches, bench_extraction, bench_haversine, bench_resolve);
criterion_main!(benches);
