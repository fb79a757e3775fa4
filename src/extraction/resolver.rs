//! Keyword-set resolution for rooms, features, materials, colors, roof type
//! and quality indicators, with style-driven fallbacks.

use std::collections::BTreeSet;

use crate::domain::{Color, Feature, Material, QualityIndicator, RoofType, Room, Style};

use super::keywords::{first_match, matches_any, KeywordTable};

/// Rooms assumed when the description names none.
pub const MINIMUM_ROOMS: [Room; 4] = [Room::LivingRoom, Room::Bedroom, Room::Kitchen, Room::Bathroom];

pub fn rooms(
    text: &str,
    table: &KeywordTable,
    bedrooms: Option<u32>,
    bathrooms: Option<u32>,
) -> BTreeSet<Room> {
    let mut rooms: BTreeSet<Room> = Room::ALL
        .iter()
        .copied()
        .filter(|room| matches_any(text, table.room_phrases(*room)))
        .collect();

    if bedrooms.is_some_and(|n| n > 0) {
        rooms.insert(Room::Bedroom);
    }
    if bathrooms.is_some_and(|n| n > 0) {
        rooms.insert(Room::Bathroom);
    }
    if rooms.is_empty() {
        rooms.extend(MINIMUM_ROOMS);
    }
    rooms
}

pub fn features(text: &str, table: &KeywordTable) -> BTreeSet<Feature> {
    Feature::ALL
        .iter()
        .copied()
        .filter(|feature| matches_any(text, table.feature_phrases(*feature)))
        .collect()
}

pub fn quality_indicators(text: &str, table: &KeywordTable) -> BTreeSet<QualityIndicator> {
    QualityIndicator::ALL
        .iter()
        .copied()
        .filter(|indicator| matches_any(text, table.quality_phrases(*indicator)))
        .collect()
}

/// Materials in order of first mention, else the style's defaults.
pub fn materials(text: &str, table: &KeywordTable, style: Style) -> Vec<Material> {
    let found = ordered_by_mention(text, Material::ALL, |m| table.material_phrases(m));
    if !found.is_empty() {
        return found;
    }
    let defaults = &table.style(style).default_materials;
    if defaults.is_empty() {
        vec![Material::Concrete]
    } else {
        defaults.clone()
    }
}

/// Colors in order of first mention, else the style's defaults.
pub fn colors(text: &str, table: &KeywordTable, style: Style) -> Vec<Color> {
    let found = ordered_by_mention(text, Color::ALL, |c| table.color_phrases(c));
    if !found.is_empty() {
        return found;
    }
    let defaults = &table.style(style).default_colors;
    if defaults.is_empty() {
        vec![Color::White]
    } else {
        defaults.clone()
    }
}

/// First roof type (canonical order) with an explicit phrase, else the
/// style's default roof, else flat.
pub fn roof_type(text: &str, table: &KeywordTable, style: Style) -> RoofType {
    RoofType::ALL
        .iter()
        .copied()
        .find(|roof| matches_any(text, table.roof_phrases(*roof)))
        .or(table.style(style).roof)
        .unwrap_or(RoofType::Flat)
}

fn ordered_by_mention<'t, T: Copy>(
    text: &str,
    candidates: &[T],
    phrases_for: impl Fn(T) -> &'t [String],
) -> Vec<T> {
    let mut hits: Vec<(usize, T)> = candidates
        .iter()
        .filter_map(|&candidate| first_match(text, phrases_for(candidate)).map(|pos| (pos, candidate)))
        .collect();
    // stable: equal positions keep canonical order
    hits.sort_by_key(|(pos, _)| *pos);
    hits.into_iter().map(|(_, candidate)| candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> &'static KeywordTable {
        KeywordTable::builtin()
    }

    #[test]
    fn rooms_default_to_minimum_set() {
        let rooms = rooms("a house", table(), None, None);
        assert_eq!(rooms, MINIMUM_ROOMS.into_iter().collect());
    }

    #[test]
    fn rooms_collapse_duplicates_and_follow_counts() {
        let found = rooms("kitchen, kitchenette and a puja room", table(), Some(3), None);
        assert_eq!(
            found,
            [Room::Bedroom, Room::Kitchen, Room::PujaRoom].into_iter().collect()
        );
    }

    #[test]
    fn features_are_detected_by_phrase() {
        let found = features("with a swimming pool, lawns and stone pillars", table());
        assert!(found.contains(&Feature::SwimmingPool));
        assert!(found.contains(&Feature::Garden));
        assert!(found.contains(&Feature::Pillars));
        assert!(!found.contains(&Feature::Dome));
    }

    #[test]
    fn materials_keep_first_seen_order() {
        let found = materials("timber frame on granite with glass", table(), Style::Modern);
        assert_eq!(found, vec![Material::Wood, Material::Granite, Material::Glass]);
    }

    #[test]
    fn materials_and_colors_fall_back_to_style_defaults() {
        assert_eq!(
            materials("a house", table(), Style::Rajasthani),
            vec![Material::Sandstone, Material::Marble]
        );
        assert_eq!(colors("a house", table(), Style::Modern)[0], Color::White);

        let empty = KeywordTable::default();
        assert_eq!(materials("a house", &empty, Style::Kerala), vec![Material::Concrete]);
        assert_eq!(colors("a house", &empty, Style::Kerala), vec![Color::White]);
    }

    #[test]
    fn roof_prefers_explicit_phrase() {
        assert_eq!(roof_type("a kerala house", table(), Style::Kerala), RoofType::Sloped);
        assert_eq!(roof_type("with a flat roof", table(), Style::Kerala), RoofType::Flat);
        assert_eq!(roof_type("a house", table(), Style::Colonial), RoofType::Hipped);
        assert_eq!(roof_type("a house", &KeywordTable::default(), Style::Kerala), RoofType::Flat);
    }

    #[test]
    fn quality_indicators_from_sentiment_words() {
        let found = quality_indicators("a luxurious but simple home", table());
        assert_eq!(
            found,
            [QualityIndicator::Luxury, QualityIndicator::Simple].into_iter().collect()
        );
    }
}
