//! Keyword table: trigger phrases, classifier weights and per-category defaults.
//!
//! The built-in table is `data/keywords.json`, embedded at compile time and
//! parsed once. Lookups always go through the enum, so iteration order is the
//! canonical enum order no matter how the JSON maps are ordered.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

use crate::domain::{
    Color, Dimensions, Feature, HouseType, Material, QualityIndicator, RoofType, Room, Style,
};

const BUILTIN_JSON: &str = include_str!("../../data/keywords.json");

static EMPTY_STYLE: StyleProfile = StyleProfile::EMPTY;
static EMPTY_HOUSE_TYPE: HouseTypeProfile = HouseTypeProfile::EMPTY;

static BUILTIN: LazyLock<KeywordTable> = LazyLock::new(|| {
    KeywordTable::from_json(BUILTIN_JSON).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Built-in keyword table is invalid, using an empty table");
        KeywordTable::default()
    })
});

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read keyword table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid keyword table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Per-signal weights of one classifier.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierWeights {
    pub keyword: f64,
    pub feature: f64,
    pub material: f64,
    pub color: f64,
    pub room: f64,
    pub semantic: f64,
}

impl Default for ClassifierWeights {
    fn default() -> Self {
        Self {
            keyword: 2.0,
            feature: 1.5,
            material: 1.0,
            color: 0.5,
            room: 0.0,
            semantic: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Weights {
    #[serde(default)]
    pub style: ClassifierWeights,
    #[serde(default = "default_house_type_weights")]
    pub house_type: ClassifierWeights,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            style: ClassifierWeights::default(),
            house_type: default_house_type_weights(),
        }
    }
}

fn default_house_type_weights() -> ClassifierWeights {
    ClassifierWeights {
        keyword: 3.0,
        room: 1.0,
        semantic: 2.0,
        ..ClassifierWeights::default()
    }
}

/// Phrase signals that vote for one category.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Signals {
    pub keywords: Vec<String>,
    pub features: Vec<String>,
    pub materials: Vec<String>,
    pub colors: Vec<String>,
    pub rooms: Vec<String>,
}

impl Signals {
    const EMPTY: Signals = Signals {
        keywords: Vec::new(),
        features: Vec::new(),
        materials: Vec::new(),
        colors: Vec::new(),
        rooms: Vec::new(),
    };

    fn normalize(&mut self) {
        for list in [
            &mut self.keywords,
            &mut self.features,
            &mut self.materials,
            &mut self.colors,
            &mut self.rooms,
        ] {
            normalize_phrases(list);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StyleProfile {
    #[serde(flatten)]
    pub signals: Signals,
    #[serde(default)]
    pub roof: Option<RoofType>,
    #[serde(default)]
    pub default_materials: Vec<Material>,
    #[serde(default)]
    pub default_colors: Vec<Color>,
}

impl StyleProfile {
    const EMPTY: StyleProfile = StyleProfile {
        signals: Signals::EMPTY,
        roof: None,
        default_materials: Vec::new(),
        default_colors: Vec::new(),
    };
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HouseTypeProfile {
    #[serde(flatten)]
    pub signals: Signals,
    #[serde(default)]
    pub base_dimensions: Option<Dimensions>,
}

impl HouseTypeProfile {
    const EMPTY: HouseTypeProfile = HouseTypeProfile {
        signals: Signals::EMPTY,
        base_dimensions: None,
    };
}

/// Immutable rule table driving every extractor and classifier.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    pub weights: Weights,
    styles: BTreeMap<Style, StyleProfile>,
    house_types: BTreeMap<HouseType, HouseTypeProfile>,
    rooms: BTreeMap<Room, Vec<String>>,
    features: BTreeMap<Feature, Vec<String>>,
    materials: BTreeMap<Material, Vec<String>>,
    colors: BTreeMap<Color, Vec<String>>,
    roofs: BTreeMap<RoofType, Vec<String>>,
    quality_indicators: BTreeMap<QualityIndicator, Vec<String>>,
}

impl KeywordTable {
    /// The table compiled into the binary.
    pub fn builtin() -> &'static KeywordTable {
        &BUILTIN
    }

    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let mut table: KeywordTable = serde_json::from_str(json)?;
        table.normalize();
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), "Loaded keyword table");
        Ok(table)
    }

    fn normalize(&mut self) {
        for profile in self.styles.values_mut() {
            profile.signals.normalize();
        }
        for profile in self.house_types.values_mut() {
            profile.signals.normalize();
        }
        self.rooms.values_mut().for_each(normalize_phrases);
        self.features.values_mut().for_each(normalize_phrases);
        self.materials.values_mut().for_each(normalize_phrases);
        self.colors.values_mut().for_each(normalize_phrases);
        self.roofs.values_mut().for_each(normalize_phrases);
        self.quality_indicators.values_mut().for_each(normalize_phrases);
    }

    pub fn style(&self, style: Style) -> &StyleProfile {
        self.styles.get(&style).unwrap_or(&EMPTY_STYLE)
    }

    pub fn house_type(&self, house_type: HouseType) -> &HouseTypeProfile {
        self.house_types
            .get(&house_type)
            .unwrap_or(&EMPTY_HOUSE_TYPE)
    }

    pub fn room_phrases(&self, room: Room) -> &[String] {
        phrases(&self.rooms, room)
    }

    pub fn feature_phrases(&self, feature: Feature) -> &[String] {
        phrases(&self.features, feature)
    }

    pub fn material_phrases(&self, material: Material) -> &[String] {
        phrases(&self.materials, material)
    }

    pub fn color_phrases(&self, color: Color) -> &[String] {
        phrases(&self.colors, color)
    }

    pub fn roof_phrases(&self, roof: RoofType) -> &[String] {
        phrases(&self.roofs, roof)
    }

    pub fn quality_phrases(&self, indicator: QualityIndicator) -> &[String] {
        phrases(&self.quality_indicators, indicator)
    }
}

fn phrases<K: Ord>(map: &BTreeMap<K, Vec<String>>, key: K) -> &[String] {
    map.get(&key).map(Vec::as_slice).unwrap_or(&[])
}

fn normalize_phrases(list: &mut Vec<String>) {
    for phrase in list.iter_mut() {
        *phrase = normalize_text(phrase);
    }
    list.retain(|phrase| !phrase.is_empty());
}

/// Lowercases and collapses runs of whitespace to single spaces.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Byte offset of the first whole-word occurrence of `phrase` in `text`.
///
/// Both inputs must already be normalized. This is stricter than a plain
/// substring search: a match must start at a word boundary and end at one,
/// optionally after a plural `s` or `es`, so `pillar` finds "pillars" but
/// `pool` does not find "pooja" and `stone` does not find "sandstone".
/// Derived forms such as "wooden" are listed as phrases of their own.
pub fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    text.match_indices(phrase).map(|(start, _)| start).find(|&start| {
        let starts_word = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        starts_word && ends_word(&text[start + phrase.len()..])
    })
}

fn ends_word(rest: &str) -> bool {
    let rest = rest
        .strip_prefix("es")
        .filter(|r| at_boundary(r))
        .or_else(|| rest.strip_prefix('s'))
        .unwrap_or(rest);
    at_boundary(rest)
}

fn at_boundary(rest: &str) -> bool {
    rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
}

/// Earliest position at which any of `phrases` occurs.
pub fn first_match(text: &str, phrases: &[String]) -> Option<usize> {
    phrases
        .iter()
        .filter_map(|phrase| find_phrase(text, phrase))
        .min()
}

pub fn matches_any(text: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| find_phrase(text, phrase).is_some())
}

/// Number of distinct phrases from `phrases` present in `text`.
pub fn count_matches(text: &str, phrases: &[String]) -> usize {
    phrases
        .iter()
        .filter(|phrase| find_phrase(text, phrase).is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_every_category() {
        let table = KeywordTable::builtin();
        for style in Style::ALL {
            assert!(
                !table.style(*style).signals.keywords.is_empty(),
                "no keywords for {style}"
            );
            assert!(table.style(*style).roof.is_some(), "no roof for {style}");
        }
        for house_type in HouseType::ALL {
            let profile = table.house_type(*house_type);
            assert!(!profile.signals.keywords.is_empty(), "no keywords for {house_type}");
            assert!(profile.base_dimensions.is_some(), "no dimensions for {house_type}");
        }
        for room in Room::ALL {
            assert!(!table.room_phrases(*room).is_empty(), "no phrases for {room}");
        }
        for feature in Feature::ALL {
            assert!(!table.feature_phrases(*feature).is_empty(), "no phrases for {feature}");
        }
    }

    #[test]
    fn missing_entries_fall_back_to_empty_profiles() {
        let table = KeywordTable::from_json(r#"{"styles": {"kerala": {"keywords": ["Kerala "]}}}"#)
            .unwrap();
        assert_eq!(table.style(Style::Kerala).signals.keywords, vec!["kerala"]);
        assert!(table.style(Style::Modern).signals.keywords.is_empty());
        assert!(table.house_type(HouseType::Villa).base_dimensions.is_none());
        assert!(table.room_phrases(Room::Kitchen).is_empty());
        assert_eq!(table.weights.house_type.keyword, 3.0);
    }

    #[test]
    fn invalid_tables_are_rejected() {
        assert!(matches!(
            KeywordTable::from_json("{\"styles\": 3}"),
            Err(TableError::Parse(_))
        ));
        assert!(matches!(
            KeywordTable::from_path("/definitely/not/here.json"),
            Err(TableError::Io { .. })
        ));
    }

    #[test]
    fn from_path_reads_a_custom_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");
        std::fs::write(&path, r#"{"roofs": {"flat": ["Terrace Roof"]}}"#).unwrap();

        let table = KeywordTable::from_path(&path).unwrap();
        assert_eq!(table.roof_phrases(RoofType::Flat), ["terrace roof".to_string()]);
    }

    #[test]
    fn phrases_match_whole_words_and_plurals() {
        assert_eq!(find_phrase("two pillars here", "pillar"), Some(4));
        assert_eq!(find_phrase("with arches", "arch"), Some(5));
        assert_eq!(find_phrase("a pooja room", "pool"), None);
        assert_eq!(find_phrase("red sandstone", "stone"), None);
        assert_eq!(find_phrase("stone-clad", "stone"), Some(0));
        assert_eq!(find_phrase("a modern house", "new age"), None);
    }

    #[test]
    fn first_match_reports_earliest_phrase() {
        let phrases = vec!["timber".to_string(), "wood".to_string()];
        assert_eq!(first_match("wood and timber", &phrases), Some(0));
        assert!(matches_any("timber", &phrases));
        assert_eq!(count_matches("wood and timber", &phrases), 2);
    }

    #[test]
    fn normalize_text_collapses_whitespace() {
        assert_eq!(normalize_text("  Modern\t\nVilla  "), "modern villa");
    }
}
