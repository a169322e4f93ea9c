use clap::{Parser, Subcommand};
use geofilter_core::{Coordinate, DistanceUnit};
use std::path::PathBuf;

/// CLI arguments for geofilter
#[derive(Debug, Parser)]
#[command(
    name = "geofilter",
    version,
    about = "Extract cities, validate coordinates and resolve location filters"
)]
pub struct CliArgs {
    /// Path to a JSON configuration file (region, TTLs, word lists, ...)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Path to a gazetteer file (.json or .json.gz) replacing the configured known cities
    #[arg(short = 'g', long = "gazetteer", global = true)]
    pub gazetteer: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract the city from a free-text address
    City {
        /// Address text (e.g. "123 Ben Gurion St, Tel Aviv, Israel")
        text: String,
    },

    /// Check a coordinate against the valid range and the service region
    Validate {
        #[arg(allow_hyphen_values = true)]
        lat: String,
        #[arg(allow_hyphen_values = true)]
        lng: String,
    },

    /// Great-circle distance between two points
    Distance {
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lng1: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        #[arg(allow_hyphen_values = true)]
        lng2: f64,

        /// Display unit (km or m)
        #[arg(long, default_value = "km")]
        unit: DistanceUnit,

        /// Decimals when displaying kilometres
        #[arg(long, default_value_t = 1)]
        precision: usize,
    },

    /// Resolve the filtering mode for a set of inputs and print it as JSON
    Resolve {
        /// Selected city; its coordinate is looked up in the gazetteer
        #[arg(long)]
        city: Option<String>,

        /// Search radius in kilometres, as typed
        #[arg(long)]
        radius: Option<String>,

        /// Device location as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        device: Option<Coordinate>,

        /// Work-area city (repeatable)
        #[arg(long = "work-area")]
        work_areas: Vec<String>,

        /// Country-wide override
        #[arg(long)]
        country_wide: bool,
    },

    /// Forward-geocode an address (needs the `http` feature; reads GEOCODER_API_KEY)
    Geocode { address: String },

    /// Reverse-geocode a coordinate (needs the `http` feature; reads GEOCODER_API_KEY)
    Reverse {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },
}
