//! geofilter: command-line interface for geofilter-core
//!
//! Usage examples
//! --------------
//!
//! - Extract the city from an address
//!   $ geofilter city "123 Ben Gurion St, Tel Aviv, Israel"
//!
//! - Check a coordinate (range and service region)
//!   $ geofilter validate 32.0853 34.7818
//!
//! - Distance between two points
//!   $ geofilter distance 32.0853 34.7818 31.7683 35.2137 --precision 2
//!
//! - Resolve the filtering mode
//!   $ geofilter resolve --city Haifa --radius 10
//!   $ geofilter resolve --work-area Haifa --work-area Acre
//!
//! - Live lookups (built with `--features http`, key in GEOCODER_API_KEY)
//!   $ geofilter geocode "Dizengoff 50, Tel Aviv"
//!   $ geofilter reverse 32.0853 34.7818
//!
//! Configuration
//! -------------
//!
//! `--config <file.json>` overrides any subset of the defaults (Israel
//! bounding box, five-minute cache TTL, known cities, word lists).
//! `--gazetteer <file.json[.gz]>` replaces the known-city list only.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use geofilter_core::{
    format_distance, haversine_km, City, CityExtractor, CoordinateValidator, FilterInputs,
    FilteringModeResolver, GeoConfig, Gazetteer,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    debug!(known_cities = config.known_cities.len(), "configuration loaded");

    match args.command {
        Commands::City { text } => {
            let extraction = CityExtractor::from_config(&config).from_text_detailed(&text);
            println!("{}", extraction.city);
            println!("  source: {:?}", extraction.source);
            if !extraction.is_confident() {
                println!("  (low confidence)");
            }
        }

        Commands::Validate { lat, lng } => {
            let validator = CoordinateValidator::new(config.region);
            let coordinate = validator
                .parse(&lat, &lng)
                .with_context(|| format!("invalid coordinate {lat},{lng}"))?;
            let region = if validator.is_in_region(&coordinate) {
                "inside service region"
            } else {
                "outside service region"
            };
            println!("{coordinate} ({region})");
        }

        Commands::Distance { lat1, lng1, lat2, lng2, unit, precision } => {
            let validator = CoordinateValidator::new(config.region);
            validator.validate(lat1, lng1).context("first point")?;
            validator.validate(lat2, lng2).context("second point")?;
            let km = haversine_km(lat1, lng1, lat2, lng2);
            println!("{}", format_distance(km, unit, precision));
        }

        Commands::Resolve { city, radius, device, work_areas, country_wide } => {
            let gazetteer = config.gazetteer();
            let selected_city = city.unwrap_or_default();
            let selected_city_coordinate = gazetteer
                .lookup(&selected_city)
                .and_then(|entry| entry.coordinate);
            if !selected_city.trim().is_empty() && selected_city_coordinate.is_none() {
                debug!(city = %selected_city, "city not in gazetteer; no coordinate");
            }

            let inputs = FilterInputs {
                selected_city,
                selected_city_coordinate,
                device_location: device,
                distance_radius: radius,
                work_area_cities: work_areas.iter().map(City::new).collect(),
                country_wide,
            };
            let resolver = FilteringModeResolver::new(CoordinateValidator::new(config.region));
            let filter = resolver.resolve(&inputs);
            println!("{}", serde_json::to_string_pretty(&filter)?);
        }

        #[cfg(feature = "http")]
        Commands::Geocode { address } => {
            let cache = http_cache(&config)?;
            print_lookup(cache.forward(&address).await)?;
        }

        #[cfg(feature = "http")]
        Commands::Reverse { lat, lng } => {
            let cache = http_cache(&config)?;
            print_lookup(cache.reverse(lat, lng).await)?;
        }

        #[cfg(not(feature = "http"))]
        Commands::Geocode { .. } | Commands::Reverse { .. } => {
            bail!("live geocoding is not available; rebuild with `--features http`")
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &CliArgs) -> anyhow::Result<GeoConfig> {
    let mut config = match &args.config {
        Some(path) => GeoConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeoConfig::default(),
    };

    if let Some(path) = &args.gazetteer {
        let gazetteer = Gazetteer::load_from_path(path)
            .with_context(|| format!("loading gazetteer {}", path.display()))?;
        if gazetteer.is_empty() {
            bail!("gazetteer {} has no entries", path.display());
        }
        config.known_cities = gazetteer.entries().to_vec();
    }

    Ok(config)
}

#[cfg(feature = "http")]
fn http_cache(
    config: &GeoConfig,
) -> anyhow::Result<geofilter_core::GeocodeCache<geofilter_core::HttpGeocoder>> {
    let api_key = std::env::var("GEOCODER_API_KEY")
        .context("GEOCODER_API_KEY must be set for live geocoding")?;
    let geocoder = geofilter_core::HttpGeocoder::new(api_key)?;
    Ok(geofilter_core::GeocodeCache::new(geocoder, config))
}

#[cfg(feature = "http")]
fn print_lookup<T: serde::Serialize>(lookup: geofilter_core::Lookup<T>) -> anyhow::Result<()> {
    match lookup {
        geofilter_core::Lookup::Found { value, .. } => {
            println!("{}", serde_json::to_string_pretty(value.as_ref())?);
            Ok(())
        }
        geofilter_core::Lookup::Missing { kind, .. } => bail!("no result ({kind:?})"),
        geofilter_core::Lookup::Superseded => bail!("lookup was superseded"),
    }
}
