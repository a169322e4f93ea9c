// crates/geofilter-core/src/city.rs

//! # City extraction
//!
//! Heuristic mapping from raw address text, or from the structured place
//! components a geocoder returns, to one canonical [`City`].
//!
//! Both entry points are total: they never fail and never return an empty
//! string. When nothing usable is found they return [`City::unspecified`].
//!
//! The known-city dictionary and the exclusion word lists are data
//! ([`Gazetteer`], [`GeoConfig::street_tokens`], [`GeoConfig::region_tokens`]).

use crate::common::City;
use crate::config::{GeoConfig, DEFAULT_REGION_TOKENS, DEFAULT_STREET_TOKENS};
use crate::gazetteer::{Gazetteer, GazetteerEntry};
use crate::text::{comma_segments, fold_key};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Component types that can name a city, best first.
pub const CITY_COMPONENT_PRIORITY: &[&str] = &[
    "locality",
    "administrative_area_level_2",
    "sublocality_level_1",
    "sublocality",
    "political",
];

/// Component types a reverse lookup reads the city from, best first.
pub const REVERSE_CITY_TYPES: &[&str] = &["locality", "administrative_area_level_1"];

static HOUSE_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\d+(?:[/-]\d+)?[A-Za-z]?(?:\s+|\s*,\s*|$)").expect("static regex is valid")
});

static POSTAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{5}(?:\d{2})?\b").expect("static regex is valid"));

static DEFAULT_EXTRACTOR: Lazy<CityExtractor> = Lazy::new(|| {
    CityExtractor::new(
        Gazetteer::builtin().clone(),
        DEFAULT_STREET_TOKENS.iter().copied(),
        DEFAULT_REGION_TOKENS.iter().copied(),
    )
});

/// A structured fragment from an external place lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceComponent {
    #[serde(alias = "long_name")]
    pub name: String,
    #[serde(default)]
    pub types: BTreeSet<String>,
}

impl PlaceComponent {
    pub fn new(name: &str, types: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn has_type(&self, kind: &str) -> bool {
        self.types.contains(kind)
    }
}

/// Which heuristic produced a city.
///
/// `Component` and `Dictionary` hits are reliable; the segment heuristics
/// are guesses a caller may want to confirm with the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Component(&'static str),
    Dictionary,
    TailSegment,
    SegmentScan,
    Fallback,
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub city: City,
    pub source: ExtractionSource,
}

impl Extraction {
    fn new(city: impl AsRef<str>, source: ExtractionSource) -> Self {
        let city = City::new(city);
        if city.is_unspecified() {
            return Self::unspecified();
        }
        Self { city, source }
    }

    fn unspecified() -> Self {
        Self {
            city: City::unspecified(),
            source: ExtractionSource::Unspecified,
        }
    }

    pub fn is_confident(&self) -> bool {
        matches!(
            self.source,
            ExtractionSource::Component(_) | ExtractionSource::Dictionary
        )
    }
}

#[derive(Debug, Clone)]
pub struct CityExtractor {
    gazetteer: Gazetteer,
    street_tokens: HashSet<String>,
    region_tokens: HashSet<String>,
}

impl CityExtractor {
    pub fn new<'a>(
        gazetteer: Gazetteer,
        street_tokens: impl IntoIterator<Item = &'a str>,
        region_tokens: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let normalize = |t: &str| t.trim().to_lowercase();
        Self {
            gazetteer,
            street_tokens: street_tokens.into_iter().map(normalize).collect(),
            region_tokens: region_tokens.into_iter().map(normalize).collect(),
        }
    }

    pub fn from_config(config: &GeoConfig) -> Self {
        Self::new(
            config.gazetteer(),
            config.street_tokens.iter().map(String::as_str),
            config.region_tokens.iter().map(String::as_str),
        )
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    // -----------------------------------------------------------------------
    // STRUCTURED COMPONENTS
    // -----------------------------------------------------------------------

    /// Best city among `components`, falling back to the text heuristics on
    /// `formatted_address` when no component qualifies.
    ///
    /// ```rust
    /// use geofilter_core::{CityExtractor, PlaceComponent};
    ///
    /// let components = vec![
    ///     PlaceComponent::new("Israel", &["country", "political"]),
    ///     PlaceComponent::new("Haifa", &["locality", "political"]),
    /// ];
    /// let city = CityExtractor::default().from_components(&components, None);
    /// assert_eq!(city.as_str(), "Haifa");
    /// ```
    pub fn from_components(&self, components: &[PlaceComponent], formatted_address: Option<&str>) -> City {
        self.from_components_detailed(components, formatted_address).city
    }

    pub fn from_components_detailed(
        &self,
        components: &[PlaceComponent],
        formatted_address: Option<&str>,
    ) -> Extraction {
        let mut best: Option<(usize, &PlaceComponent)> = None;

        for component in components {
            let Some(rank) = CITY_COMPONENT_PRIORITY
                .iter()
                .position(|kind| component.has_type(kind))
            else {
                continue;
            };
            if !self.is_plausible_component(&component.name) {
                continue;
            }
            // Strictly better only: ties keep the earlier component.
            if best.map_or(true, |(best_rank, _)| rank < best_rank) {
                best = Some((rank, component));
            }
        }

        match (best, formatted_address) {
            (Some((rank, component)), _) => Extraction::new(
                &component.name,
                ExtractionSource::Component(CITY_COMPONENT_PRIORITY[rank]),
            ),
            (None, Some(address)) => self.from_text_detailed(address),
            (None, None) => Extraction::unspecified(),
        }
    }

    /// City from a reverse lookup result: `locality`, else
    /// `administrative_area_level_1`, else the formatted address.
    pub fn from_reverse_components(&self, components: &[PlaceComponent], formatted_address: &str) -> City {
        REVERSE_CITY_TYPES
            .iter()
            .find_map(|kind| {
                components
                    .iter()
                    .find(|c| c.has_type(kind) && !c.name.trim().is_empty())
            })
            .map(|c| City::new(&c.name))
            .unwrap_or_else(|| self.from_text(formatted_address))
    }

    fn is_plausible_component(&self, name: &str) -> bool {
        let name = name.trim();
        if name.chars().count() < 2 || name.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
            return false;
        }
        // Known cities win over the word lists ("שדרות" is also "boulevard").
        if self.gazetteer.lookup(name).is_some() {
            return true;
        }
        !self.is_region(name) && !self.is_street(name)
    }

    // -----------------------------------------------------------------------
    // FREE TEXT
    // -----------------------------------------------------------------------

    /// City from free-form address text.
    ///
    /// ```rust
    /// use geofilter_core::CityExtractor;
    ///
    /// let x = CityExtractor::default();
    /// assert_eq!(x.from_text("123 Ben Gurion St, Tel Aviv, Israel").as_str(), "Tel Aviv");
    /// assert_eq!(x.from_text("5 Main Rd, Springfield, Israel").as_str(), "Springfield");
    /// assert!(x.from_text("   ").is_unspecified());
    /// ```
    pub fn from_text(&self, text: &str) -> City {
        self.from_text_detailed(text).city
    }

    pub fn from_text_detailed(&self, text: &str) -> Extraction {
        let text = text.trim();
        if text.is_empty() {
            return Extraction::unspecified();
        }

        if let Some(entry) = self.dictionary_match(text) {
            return Extraction::new(&entry.name, ExtractionSource::Dictionary);
        }

        let stripped = strip_house_number(text);
        let segments: Vec<String> = comma_segments(stripped)
            .into_iter()
            .map(strip_postal_code)
            .filter(|s| !s.is_empty())
            .collect();

        if segments.len() > 1 {
            let tail = segments.iter().rev().take(2).find(|s| self.is_tail_city(s));
            if let Some(seg) = tail {
                return Extraction::new(seg, ExtractionSource::TailSegment);
            }
        }

        let scanned = segments.iter().find(|s| {
            !starts_with_digit(s) && s.chars().count() > 2 && !self.is_street(s)
        });
        if let Some(seg) = scanned {
            return Extraction::new(seg, ExtractionSource::SegmentScan);
        }

        let first = stripped.split(',').next().unwrap_or(stripped);
        let fallback = if first.trim().is_empty() { text } else { first };
        let fallback = fallback.trim_matches(|c: char| c == ',' || c.is_whitespace());
        // House numbers and postal codes alone never name a city.
        if !fallback.chars().any(char::is_alphabetic) {
            return Extraction::unspecified();
        }
        Extraction::new(fallback, ExtractionSource::Fallback)
    }

    /// First gazetteer spelling found in `text`. A spelling that is also a
    /// street word only counts when it stands as a whole comma segment.
    fn dictionary_match(&self, text: &str) -> Option<&GazetteerEntry> {
        let segments = comma_segments(text);
        self.gazetteer
            .matches_in_text(text)
            .find(|(spelling, _)| {
                !self.street_tokens.contains(*spelling)
                    || segments
                        .iter()
                        .any(|s| fold_key(s) == *spelling || s.to_lowercase() == *spelling)
            })
            .map(|(_, entry)| entry)
    }

    fn is_tail_city(&self, segment: &str) -> bool {
        segment.chars().count() > 2
            && segment.chars().any(char::is_alphabetic)
            && !self.is_region(segment)
    }

    // -----------------------------------------------------------------------
    // WORD LISTS
    // -----------------------------------------------------------------------

    /// Country or administrative-district wording.
    pub fn is_region(&self, s: &str) -> bool {
        matches_token(s, &self.region_tokens)
    }

    /// Leading house number or a street-name token.
    pub fn is_street(&self, s: &str) -> bool {
        starts_with_digit(s) || matches_token(s, &self.street_tokens)
    }
}

impl Default for CityExtractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.trim_start().starts_with(|c: char| c.is_ascii_digit())
}

fn strip_house_number(s: &str) -> &str {
    match HOUSE_NUMBER.find(s) {
        Some(m) => s[m.end()..].trim(),
        None => s.trim(),
    }
}

fn strip_postal_code(s: &str) -> String {
    POSTAL_CODE
        .replace_all(s, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Word-level match; multi-word tokens match as substrings.
fn matches_token(s: &str, tokens: &HashSet<String>) -> bool {
    let lowered = s.to_lowercase();
    let word_hit = lowered
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '(' | ')' | '-'))
        .map(|w| w.trim_end_matches('.'))
        .filter(|w| !w.is_empty())
        .any(|w| tokens.contains(w));
    word_hit
        || tokens
            .iter()
            .filter(|t| t.contains(' '))
            .any(|t| lowered.contains(t.as_str()))
}
