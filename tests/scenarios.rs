//! End-to-end behaviour of the extraction and composition pipeline.

use approx::assert_abs_diff_eq;

use housegen_backend::composer::SceneComposer;
use housegen_backend::domain::generation::EXAMPLES;
use housegen_backend::domain::{
    AttributeRecord, Color, Feature, HouseType, Material, PrimitiveKind, RoofType, Room, Scene,
    Shape, Style, MAX_DIMENSION,
};
use housegen_backend::extraction::{AttributeExtractor, KeywordTable};

const FEET: f64 = 0.3048;

const CORPUS: &[&str] = &[
    "",
    "a house",
    "G+3 modern building",
    "modern 2 floor villa with swimming pool",
    "traditional kerala house with courtyard, 2 floors",
    "a 12 floor tower with 40 storey annex",
    "a 9 BHK palace, royal, palatial, with a dome and fountain",
    "triple floor rajasthani haveli in sandstone, west facing, 80 lakhs",
    "simple small cottage, 0 floors, 0x0 feet",
    "colonial colonial colonial bungalow bungalow villa villa",
    "1500 sq ft duplex with parking and a garage, 2 crore budget",
    "    \t  ",
    "ÀÉÎ ünïcödé 🏠 house",
    "a rajasthani haveli with a flat roof and a garden",
    "a rajasthani palace with a sloped roof, 3 floors",
    "a 99999999999999999999 x 99999999999999999999 ft mansion with a garden and a pool",
    "a 1000000000000000000000000000000 sq ft palace with a garden",
];

fn extract(text: &str) -> AttributeRecord {
    AttributeExtractor::new(KeywordTable::builtin()).extract_text(text)
}

fn compose(record: &AttributeRecord, seed: u64) -> Scene {
    SceneComposer::new().compose(record, seed)
}

#[test]
fn floors_stay_in_range_for_any_text() {
    for text in CORPUS {
        let record = extract(text);
        assert!((1..=5).contains(&record.floors), "{text:?} -> {}", record.floors);
    }
}

#[test]
fn confidences_stay_in_unit_interval() {
    for text in CORPUS {
        let record = extract(text);
        for confidence in [record.confidence.style, record.confidence.house_type] {
            assert!((0.0..=1.0).contains(&confidence), "{text:?} -> {confidence}");
        }
    }
}

#[test]
fn rooms_materials_and_colors_are_never_empty() {
    for text in CORPUS {
        let record = extract(text);
        assert!(!record.rooms.is_empty(), "{text:?}");
        assert!(!record.materials.is_empty(), "{text:?}");
        assert!(!record.colors.is_empty(), "{text:?}");
    }
}

#[test]
fn dimensions_are_always_positive() {
    for text in CORPUS {
        let d = extract(text).dimensions;
        assert!(d.width >= 1.0 && d.length >= 1.0 && d.height >= 1.0, "{text:?} -> {d:?}");
    }
}

#[test]
fn dimensions_stay_bounded_for_any_text() {
    for text in CORPUS {
        let d = extract(text).dimensions;
        for extent in [d.width, d.length, d.height] {
            assert!(extent <= MAX_DIMENSION, "{text:?} -> {d:?}");
        }
    }
}

#[test]
fn scene_geometry_is_finite_for_any_text() {
    for text in CORPUS {
        let scene = compose(&extract(text), 3);
        let json = serde_json::to_value(&scene).unwrap();
        assert!(!contains_null(&json), "{text:?}");
        for primitive in &scene.primitives {
            let p = &primitive.position;
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite(), "{text:?}");
        }
    }
}

fn contains_null(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Array(items) => items.iter().any(contains_null),
        serde_json::Value::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

#[test]
fn extraction_is_pure() {
    for text in CORPUS {
        let first = serde_json::to_string(&extract(text)).unwrap();
        let second = serde_json::to_string(&extract(text)).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn composition_is_deterministic_per_seed() {
    for text in CORPUS {
        let record = extract(text);
        let a = serde_json::to_string(&compose(&record, 42)).unwrap();
        let b = serde_json::to_string(&compose(&record, 42)).unwrap();
        assert_eq!(a, b, "{text:?}");
    }
}

#[test]
fn seeds_never_change_structure_roof_or_windows() {
    for text in CORPUS {
        let record = extract(text);
        let a = compose(&record, 1);
        let b = compose(&record, 987_654_321);

        for prefix in ["main_structure", "ground_structure", "upper_", "roof", "dome"] {
            assert_eq!(a.named(prefix).count(), b.named(prefix).count(), "{text:?} {prefix}");
        }
        assert_eq!(a.named("window_").count(), b.named("window_").count());
        let roof = |s: &Scene| s.named("roof").map(|p| p.kind()).collect::<Vec<_>>();
        assert_eq!(roof(&a), roof(&b));
    }
}

#[test]
fn every_primitive_is_named_and_colored() {
    for text in CORPUS {
        let scene = compose(&extract(text), 7);
        assert_eq!(scene.metadata.object_count, scene.primitives.len());
        for primitive in &scene.primitives {
            assert!(!primitive.name.is_empty());
            assert!(primitive.color.hex.starts_with('#') && primitive.color.hex.len() == 7);
            assert!(primitive.color.rgb.iter().all(|c| (0.0..=1.0).contains(c)));
        }
    }
}

#[test]
fn feet_dimensions_convert_to_meters() {
    let record = extract("a house on a 40x60 feet plot");
    assert_abs_diff_eq!(record.dimensions.width, 40.0 * FEET, epsilon = 1e-6);
    assert_abs_diff_eq!(record.dimensions.length, 60.0 * FEET, epsilon = 1e-6);
}

#[test]
fn modern_villa_with_pool() {
    let record = extract("modern 2 floor villa with swimming pool");
    assert_eq!(record.style, Style::Modern);
    assert_eq!(record.house_type, HouseType::Villa);
    assert_eq!(record.floors, 2);
    assert!(record.has_feature(Feature::SwimmingPool));

    let scene = compose(&record, 2024);
    assert_eq!(scene.named("swimming_pool").count(), 1);
    assert_eq!(scene.named("dome").count(), 0);
    assert_eq!(scene.count_kind(PrimitiveKind::Sphere), 0);
}

#[test]
fn kerala_courtyard_home_gets_a_pitched_roof() {
    let record = extract("traditional kerala house with courtyard, 2 floors");
    assert_eq!(record.style, Style::Kerala);
    assert_eq!(record.roof_type, RoofType::Sloped);
    assert_eq!(record.floors, 2);

    let scene = compose(&record, 5);
    let roofs: Vec<_> = scene.named("roof").collect();
    assert_eq!(roofs.len(), 1);
    assert!(matches!(roofs[0].shape, Shape::Pyramid { .. }));
    assert_eq!(scene.named("courtyard").count(), 1);
}

#[test]
fn rajasthani_dome_replaces_any_named_roof() {
    for roof in ["flat roof", "sloped roof", "hipped roof", "mansard roof", "dome"] {
        let record = extract(&format!("a rajasthani haveli with a {roof}"));
        assert_eq!(record.style, Style::Rajasthani, "{roof}");
        for seed in [0, 1, 99] {
            let scene = compose(&record, seed);
            assert_eq!(scene.named("roof").count(), 0, "{roof}");
            assert_eq!(scene.named("dome").count(), 1, "{roof}");
            assert_eq!(scene.count_kind(PrimitiveKind::Sphere), 1, "{roof}");
        }
    }
}

#[test]
fn unrecognized_text_resolves_to_defaults() {
    let record = extract("a house");
    assert_eq!(record.style, Style::Modern);
    assert_abs_diff_eq!(record.confidence.style, 0.5);
    assert_eq!(record.house_type, HouseType::Bungalow);
    assert_abs_diff_eq!(record.confidence.house_type, 0.5);
    assert_eq!(record.floors, 2);
    assert_eq!(record.roof_type, RoofType::Flat);
    assert_eq!(
        record.rooms.iter().copied().collect::<Vec<_>>(),
        vec![Room::Bedroom, Room::LivingRoom, Room::Kitchen, Room::Bathroom]
    );
    assert!(record.features.is_empty());
    assert_eq!(record.materials, vec![Material::Concrete, Material::Glass, Material::Steel]);
    assert_eq!(record.colors, vec![Color::White, Color::Grey, Color::Black]);
    assert!(record.budget.is_none());
    assert!(record.orientation.is_none());
}

#[test]
fn ground_plus_notation_counts_the_ground_floor() {
    assert_eq!(extract("G+3 modern building").floors, 4);
}

#[test]
fn canned_examples_compose() {
    for example in EXAMPLES {
        let record = extract(example.description);
        let scene = compose(&record, 11);
        assert!(scene.primitives.len() > 3, "{}", example.id);
    }
}
