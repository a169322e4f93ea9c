// crates/geofilter-core/src/gazetteer.rs

//! # Gazetteer
//!
//! The dictionary of known city names, expressed as data. Adding a city or
//! an alias is a data edit (built-in table or a JSON file), not a code change.

use crate::common::{City, Coordinate};
use crate::text::fold_key;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A known city with its spelling variants and, when known, its centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    /// Canonical display name returned by the extractor.
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
}

impl GazetteerEntry {
    pub fn new(name: &str, aliases: &[&str], lat: f64, lng: f64) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            coordinate: Some(Coordinate::new(lat, lng)),
        }
    }

    pub fn city(&self) -> City {
        City::new(&self.name)
    }

    fn spellings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// One searchable spelling, pre-folded.
#[derive(Debug, Clone)]
struct Needle {
    key: String,
    ascii: bool,
    entry: usize,
}

#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
    /// Longest spelling first so "Tel Aviv-Yafo" wins over "Tel Aviv".
    needles: Vec<Needle>,
}

static BUILTIN: Lazy<Gazetteer> = Lazy::new(|| Gazetteer::new(builtin_entries()));

impl Gazetteer {
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        let mut needles: Vec<Needle> = entries
            .iter()
            .enumerate()
            .flat_map(|(idx, entry)| {
                entry.spellings().filter_map(move |s| {
                    let s = s.trim();
                    if s.is_empty() {
                        return None;
                    }
                    let ascii = s.is_ascii();
                    // Non-Latin spellings are matched in their own script; transliterating
                    // them would let short Latin fragments collide.
                    let key = if ascii { fold_key(s) } else { s.to_lowercase() };
                    Some(Needle { key, ascii, entry: idx })
                })
            })
            .collect();
        // Stable: equal lengths keep declaration order.
        needles.sort_by(|a, b| b.key.chars().count().cmp(&a.key.chars().count()));

        Self { entries, needles }
    }

    /// The built-in table of major Israeli cities.
    pub fn builtin() -> &'static Gazetteer {
        &BUILTIN
    }

    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First known city whose name or alias occurs in `text`.
    ///
    /// ```rust
    /// use geofilter_core::Gazetteer;
    ///
    /// let hit = Gazetteer::builtin().find_in_text("12 Herzl St, TEL AVIV, Israel").unwrap();
    /// assert_eq!(hit.name, "Tel Aviv");
    /// ```
    pub fn find_in_text(&self, text: &str) -> Option<&GazetteerEntry> {
        self.matches_in_text(text).next().map(|(_, entry)| entry)
    }

    /// Every spelling occurring in `text`, longest first, paired with its
    /// entry. Spellings are reported folded (ASCII) or lowercased.
    pub fn matches_in_text(&self, text: &str) -> impl Iterator<Item = (&str, &GazetteerEntry)> + '_ {
        let blank = text.trim().is_empty();
        let folded = fold_key(text);
        let lowered = text.to_lowercase();
        self.needles
            .iter()
            .filter(move |n| {
                !blank
                    && if n.ascii {
                        folded.contains(&n.key)
                    } else {
                        lowered.contains(&n.key)
                    }
            })
            .map(|n| (n.key.as_str(), &self.entries[n.entry]))
    }

    /// Exact (folded) match on name or alias.
    pub fn lookup(&self, name: &str) -> Option<&GazetteerEntry> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let folded = fold_key(name);
        let lowered = name.to_lowercase();
        self.needles
            .iter()
            .find(|n| if n.ascii { n.key == folded } else { n.key == lowered })
            .map(|n| &self.entries[n.entry])
    }

    /// Load entries from a `.json` (or, with `compact`, `.json.gz`) file.
    #[cfg(feature = "json")]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let reader = crate::loader::open_stream(path.as_ref())?;
        let entries: Vec<GazetteerEntry> = serde_json::from_reader(reader)?;
        tracing::debug!(count = entries.len(), path = %path.as_ref().display(), "loaded gazetteer");
        Ok(Self::new(entries))
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Gazetteer::builtin().clone()
    }
}

fn builtin_entries() -> Vec<GazetteerEntry> {
    vec![
        GazetteerEntry::new("Tel Aviv", &["Tel Aviv-Yafo", "Tel Aviv Yafo", "Tel-Aviv", "תל אביב", "תל אביב-יפו"], 32.0853, 34.7818),
        GazetteerEntry::new("Jerusalem", &["ירושלים"], 31.7683, 35.2137),
        GazetteerEntry::new("Haifa", &["חיפה"], 32.7940, 34.9896),
        GazetteerEntry::new("Rishon LeZion", &["Rishon Lezion", "Rishon Le Zion", "ראשון לציון"], 31.9730, 34.7925),
        GazetteerEntry::new("Petah Tikva", &["Petach Tikva", "Petah Tiqva", "פתח תקווה", "פתח תקוה"], 32.0840, 34.8878),
        GazetteerEntry::new("Ashdod", &["אשדוד"], 31.8044, 34.6553),
        GazetteerEntry::new("Netanya", &["נתניה"], 32.3215, 34.8532),
        GazetteerEntry::new("Beersheba", &["Be'er Sheva", "Beer Sheva", "Beersheva", "באר שבע"], 31.2520, 34.7915),
        GazetteerEntry::new("Holon", &["חולון"], 32.0158, 34.7874),
        GazetteerEntry::new("Bnei Brak", &["Bne Brak", "בני ברק"], 32.0807, 34.8338),
        GazetteerEntry::new("Ramat Gan", &["רמת גן"], 32.0684, 34.8248),
        GazetteerEntry::new("Ashkelon", &["אשקלון"], 31.6688, 34.5743),
        GazetteerEntry::new("Rehovot", &["רחובות"], 31.8928, 34.8113),
        GazetteerEntry::new("Bat Yam", &["בת ים"], 32.0132, 34.7480),
        GazetteerEntry::new("Herzliya", &["Herzliyya", "הרצליה"], 32.1624, 34.8447),
        GazetteerEntry::new("Kfar Saba", &["Kfar Sava", "כפר סבא"], 32.1750, 34.9069),
        GazetteerEntry::new("Hadera", &["חדרה"], 32.4340, 34.9196),
        GazetteerEntry::new("Modi'in", &["Modiin", "Modi'in-Maccabim-Re'ut", "מודיעין"], 31.8983, 35.0104),
        GazetteerEntry::new("Nazareth", &["נצרת"], 32.6996, 35.3035),
        GazetteerEntry::new("Acre", &["Akko", "Akka", "עכו"], 32.9281, 35.0818),
        GazetteerEntry::new("Eilat", &["אילת"], 29.5577, 34.9519),
        GazetteerEntry::new("Ra'anana", &["Raanana", "רעננה"], 32.1848, 34.8713),
        GazetteerEntry::new("Hod HaSharon", &["Hod Hasharon", "הוד השרון"], 32.1593, 34.8932),
        GazetteerEntry::new("Nahariya", &["נהריה"], 33.0058, 35.0989),
        GazetteerEntry::new("Tiberias", &["Tverya", "טבריה"], 32.7922, 35.5312),
        GazetteerEntry::new("Karmiel", &["Carmiel", "כרמיאל"], 32.9190, 35.2954),
        GazetteerEntry::new("Afula", &["עפולה"], 32.6078, 35.2897),
        GazetteerEntry::new("Sderot", &["שדרות"], 31.5250, 34.5969),
    ]
}
