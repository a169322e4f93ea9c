//! geofilter-cli
//! =============
//!
//! Command-line interface for the `geofilter-core` crate.
//!
//! This crate primarily provides a binary (`geofilter`). We include a small
//! library target so that a documentation page renders with this overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! geofilter --help
//! geofilter city "123 Ben Gurion St, Tel Aviv, Israel"
//! geofilter validate 32.0853 34.7818
//! geofilter distance 32.0853 34.7818 31.7683 35.2137
//! geofilter resolve --city Haifa --radius 10
//! ```
//!
//! Build with `--features http` for the `geocode` and `reverse` commands,
//! which read the provider key from `GEOCODER_API_KEY`.
//!
//! For programmatic access use [`geofilter-core`] directly.
#![cfg_attr(docsrs, feature(doc_cfg))]

// This library target intentionally exposes no API; the binary is the primary
// deliverable.
