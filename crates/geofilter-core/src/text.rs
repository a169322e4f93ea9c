// crates/geofilter-core/src/text.rs

//! Text folding helpers used for matching and cache keys.

/// Convert a string into a folded key suitable for comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Be'er Sheva` stays, `Zürich` -> `Zurich`)
/// 2\) Normalize to lowercase
///
/// The implementation uses the `deunicode` crate to perform a best-effort
/// transliteration from Unicode to ASCII.
///
/// # Examples
///
/// ```rust
/// use geofilter_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("TEL AVIV"), "tel aviv");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Cache key for a forward lookup: trimmed and case-folded.
///
/// Unlike [`fold_key`] this keeps non-ASCII letters intact, so two
/// addresses in different scripts never collide on one key.
pub fn address_key(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Parses an optional numeric string into a positive, finite `f64`.
///
/// \- Trims leading and trailing whitespace before parsing.
/// \- Returns `None` for missing, blank, non-numeric, zero or negative input.
///
/// # Examples
///
/// ```rust
/// use geofilter_core::text::parse_positive_f64;
///
/// assert_eq!(parse_positive_f64(Some(" 10 ")), Some(10.0));
/// assert_eq!(parse_positive_f64(Some("")), None);
/// assert_eq!(parse_positive_f64(Some("-3")), None);
/// assert_eq!(parse_positive_f64(None), None);
/// ```
pub fn parse_positive_f64(s: Option<&str>) -> Option<f64> {
    s.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Splits on commas and drops empty, whitespace-only segments.
pub(crate) fn comma_segments(s: &str) -> Vec<&str> {
    s.split(',')
        .map(str::trim)
        .filter(|seg| !seg.is_empty())
        .collect()
}
