// crates/geofilter-core/src/loader.rs

//! # Data Loader
//!
//! Handles the physical layer (I/O, decompression) for data files such as
//! gazetteers. Parsing is left to the caller.
#![cfg(feature = "json")]

use crate::error::{GeoError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// Opens a file, buffers it, and wraps it in a Gzip decoder when the file
/// name ends in `.gz`.
/// Returns a generic Reader so the caller doesn't care about the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoError::NotFound(format!("Data file not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if is_gzip(path) {
        #[cfg(feature = "compact")]
        {
            return Ok(Box::new(GzDecoder::new(reader)));
        }

        #[cfg(not(feature = "compact"))]
        {
            return Err(GeoError::Config(format!(
                "{} is gzip-compressed; enable the 'compact' feature",
                path.display()
            )));
        }
    }

    Ok(Box::new(reader))
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = open_stream(Path::new("/definitely/not/here.json")).err().unwrap();
        assert!(matches!(err, GeoError::NotFound(_)));
    }

    #[test]
    fn gzip_detection_uses_extension() {
        assert!(is_gzip(Path::new("cities.json.gz")));
        assert!(is_gzip(Path::new("CITIES.JSON.GZ")));
        assert!(!is_gzip(Path::new("cities.json")));
    }
}
