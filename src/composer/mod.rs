//! Seeded procedural scene composition.
//!
//! [`SceneComposer::compose`] is a pure function of `(record, seed)`. Stages
//! run in a fixed order (structure, roof, windows, door, features,
//! post-scaling) and every random draw comes from one `StdRng` seeded per
//! call, consumed in that same order.

mod features;
pub mod palette;
pub mod rules;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::domain::{
    AttributeRecord, Footprint, HouseType, Position, RoofType, Scene, SceneMetadata,
    ScenePrimitive, Shape,
};

use palette::Swatch;
use rules::{rules_for, Envelope, StyleRules};

const ROOF_SLAB_MARGIN: f64 = 0.5;
const ROOF_SLAB_THICKNESS: f64 = 0.3;
const PITCHED_ROOF_HEIGHT: f64 = 2.5;
const PITCHED_ROOF_SPAN: f64 = 0.7;
const WINDOW_SPACING: f64 = 3.0;
const MAX_WINDOWS_PER_FLOOR: usize = 4;
const WINDOW_SIZE: f64 = 1.2;
const WINDOW_SILL: f64 = 0.6;
const FACADE_OFFSET: f64 = 0.05;
const PANEL_THICKNESS: f64 = 0.1;
const BUNGALOW_MAX_HEIGHT: f64 = 4.0;
const GRAND_HEIGHT_SCALE: f64 = 1.3;
const GRAND_WIDTH_SCALE: f64 = 1.2;

#[derive(Debug, Clone, Copy, Default)]
pub struct SceneComposer;

impl SceneComposer {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip_all, fields(style = %record.style, seed = seed))]
    pub fn compose(&self, record: &AttributeRecord, seed: u64) -> Scene {
        let mut builder = SceneBuilder::new(record, seed);

        builder.structure();
        builder.roof();
        builder.windows();
        builder.door();
        builder.garden();
        builder.swimming_pool();
        builder.parking();
        builder.pillars();
        builder.balconies();
        builder.compound_wall();
        builder.courtyard();
        builder.post_scale();

        let scene = builder.finish();
        debug!(
            objects = scene.metadata.object_count,
            seed, "Composed scene"
        );
        scene
    }
}

/// Working state of one composition.
pub(crate) struct SceneBuilder<'r> {
    record: &'r AttributeRecord,
    rules: StyleRules,
    rng: StdRng,
    seed: u64,
    width: f64,
    depth: f64,
    height: f64,
    floor_height: f64,
    primitives: Vec<ScenePrimitive>,
}

impl<'r> SceneBuilder<'r> {
    fn new(record: &'r AttributeRecord, seed: u64) -> Self {
        // Records built by hand may skip the extractor's clamping.
        let dims = record.dimensions.clamped();
        let floors = crate::domain::clamp_floors(u64::from(record.floors));
        Self {
            record,
            rules: rules_for(record.style),
            rng: StdRng::seed_from_u64(seed),
            seed,
            width: dims.width,
            depth: dims.length,
            height: dims.height,
            floor_height: dims.height / f64::from(floors),
            primitives: Vec::new(),
        }
    }

    fn floors(&self) -> u8 {
        crate::domain::clamp_floors(u64::from(self.record.floors))
    }

    fn wall_material(&self) -> &'static str {
        self.record.primary_material().as_str()
    }

    fn wall_color(&self) -> Swatch {
        palette::swatch(self.record.primary_color())
    }

    fn push(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        position: Position,
        material: &str,
        color: Swatch,
    ) {
        self.primitives.push(ScenePrimitive {
            name: name.into(),
            shape,
            position,
            material: material.to_string(),
            color: color.value(),
        });
    }

    fn structure(&mut self) {
        let (w, d, h) = (self.width, self.depth, self.height);
        let material = self.wall_material();
        let color = self.wall_color();

        match self.rules.envelope {
            Envelope::Block => {
                self.push(
                    "main_structure",
                    Shape::Box { width: w, height: h, depth: d },
                    Position::new(0.0, h / 2.0, 0.0),
                    material,
                    color,
                );
            }
            Envelope::RecessedUpper => {
                self.push(
                    "main_structure",
                    Shape::Box { width: w, height: h, depth: d },
                    Position::new(0.0, h / 2.0, 0.0),
                    material,
                    color,
                );
                if self.floors() > 1 {
                    let fh = self.floor_height;
                    self.push(
                        "upper_block",
                        Shape::Box { width: w * 0.7, height: fh, depth: d * 0.6 },
                        Position::new(w * 0.3, h + fh / 2.0, 0.0),
                        material,
                        color,
                    );
                }
            }
            Envelope::StackedWithDome => {
                let lower = h * 0.7;
                let upper = h * 0.3;
                self.push(
                    "ground_structure",
                    Shape::Box { width: w, height: lower, depth: d },
                    Position::new(0.0, lower / 2.0, 0.0),
                    material,
                    color,
                );
                self.push(
                    "upper_structure",
                    Shape::Box { width: w * 0.8, height: upper, depth: d * 0.8 },
                    Position::new(0.0, lower + upper / 2.0, 0.0),
                    material,
                    color,
                );
                let radius = w * 0.2;
                self.push(
                    "dome",
                    Shape::Sphere { radius },
                    Position::new(0.0, h + radius, 0.0),
                    material,
                    palette::DOME,
                );
            }
        }
    }

    /// Styles with a structural dome are already roofed by the structure stage.
    fn roof(&mut self) {
        if self.rules.has_structural_dome() {
            return;
        }
        let (w, d, h) = (self.width, self.depth, self.height);
        match self.record.roof_type {
            RoofType::Flat => self.push(
                "roof",
                Shape::Box {
                    width: w + ROOF_SLAB_MARGIN,
                    height: ROOF_SLAB_THICKNESS,
                    depth: d + ROOF_SLAB_MARGIN,
                },
                Position::new(0.0, h + ROOF_SLAB_THICKNESS / 2.0, 0.0),
                "concrete",
                palette::FLAT_ROOF,
            ),
            RoofType::Dome => {
                let radius = w.min(d) * 0.4;
                self.push(
                    "dome_roof",
                    Shape::Sphere { radius },
                    Position::new(0.0, h, 0.0),
                    self.wall_material(),
                    palette::DOME,
                );
            }
            RoofType::Sloped | RoofType::Gabled | RoofType::Hipped | RoofType::Mansard => self.push(
                "roof",
                Shape::Pyramid {
                    radius: w.max(d) * PITCHED_ROOF_SPAN,
                    height: PITCHED_ROOF_HEIGHT,
                },
                Position::new(0.0, h + PITCHED_ROOF_HEIGHT / 2.0, 0.0),
                "tile",
                self.rules.pitched_roof_color,
            ),
        }
    }

    fn windows(&mut self) {
        let (w, d, fh) = (self.width, self.depth, self.floor_height);
        let per_floor = ((w / WINDOW_SPACING).floor() as usize).min(MAX_WINDOWS_PER_FLOOR);
        let spacing = w / (per_floor as f64 + 1.0);

        for floor in 0..self.floors() {
            let y = f64::from(floor) * fh + fh * WINDOW_SILL;
            for i in 0..per_floor {
                self.push(
                    format!("window_{floor}_{i}"),
                    Shape::Box {
                        width: WINDOW_SIZE,
                        height: WINDOW_SIZE,
                        depth: PANEL_THICKNESS,
                    },
                    Position::new(-w / 2.0 + (i as f64 + 1.0) * spacing, y, d / 2.0 + FACADE_OFFSET),
                    "glass",
                    palette::WINDOW,
                );
            }
        }
    }

    fn door(&mut self) {
        let width = 1.0 + self.rng.random::<f64>() * 0.5;
        let height = 2.0 + self.rng.random::<f64>() * 0.5;
        let z = self.depth / 2.0 + FACADE_OFFSET;
        self.push(
            "door",
            Shape::Box { width, height, depth: PANEL_THICKNESS },
            Position::new(0.0, height / 2.0, z),
            "wood",
            palette::DOOR,
        );
    }

    fn post_scale(&mut self) {
        let house_type = self.record.house_type;
        for primitive in &mut self.primitives {
            let Shape::Box { width, height, .. } = &mut primitive.shape else {
                continue;
            };
            match house_type {
                HouseType::Bungalow => *height = height.min(BUNGALOW_MAX_HEIGHT),
                HouseType::Mansion | HouseType::Palace => {
                    *height *= GRAND_HEIGHT_SCALE;
                    *width *= GRAND_WIDTH_SCALE;
                }
                _ => {}
            }
        }
    }

    fn finish(self) -> Scene {
        let footprint = footprint(&self.primitives);
        let metadata = SceneMetadata {
            object_count: self.primitives.len(),
            footprint,
            style: self.record.style,
            house_type: self.record.house_type,
            seed: self.seed,
            floor_height: self.floor_height,
            base_dimensions: format!("{:.1}x{:.1}x{:.1}", self.width, self.depth, self.height),
        };
        Scene {
            primitives: self.primitives,
            metadata,
        }
    }
}

fn footprint(primitives: &[ScenePrimitive]) -> Footprint {
    if primitives.is_empty() {
        return Footprint { min_x: 0.0, max_x: 0.0, min_z: 0.0, max_z: 0.0 };
    }
    primitives.iter().fold(
        Footprint {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        },
        |acc, p| {
            let (hx, hz) = p.shape.half_extents();
            Footprint {
                min_x: acc.min_x.min(p.position.x - hx),
                max_x: acc.max_x.max(p.position.x + hx),
                min_z: acc.min_z.min(p.position.z - hz),
                max_z: acc.max_z.max(p.position.z + hz),
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PrimitiveKind, Style};
    use crate::extraction::{AttributeExtractor, KeywordTable};
    use approx::assert_abs_diff_eq;

    fn record(text: &str) -> AttributeRecord {
        AttributeExtractor::new(KeywordTable::builtin()).extract_text(text)
    }

    fn compose(text: &str, seed: u64) -> Scene {
        SceneComposer::new().compose(&record(text), seed)
    }

    fn box_dims(p: &ScenePrimitive) -> (f64, f64, f64) {
        match p.shape {
            Shape::Box { width, height, depth } => (width, height, depth),
            other => panic!("expected a box, got {other:?}"),
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let text = "a kerala villa with a garden and a swimming pool";
        assert_eq!(compose(text, 42), compose(text, 42));
    }

    #[test]
    fn seeds_only_change_door_and_features() {
        let text = "a modern villa with a garden, 2 floors";
        let a = compose(text, 1);
        let b = compose(text, 2);
        for name in ["main_structure", "upper_block", "roof"] {
            assert_eq!(
                a.named(name).collect::<Vec<_>>(),
                b.named(name).collect::<Vec<_>>()
            );
        }
        assert_eq!(a.named("window_").count(), b.named("window_").count());
        assert_eq!(
            a.named("window_").collect::<Vec<_>>(),
            b.named("window_").collect::<Vec<_>>()
        );
    }

    #[test]
    fn modern_adds_recessed_upper_block() {
        let scene = compose("modern 2 floor villa", 7);
        let upper = scene.named("upper_block").next().unwrap();
        let (w, h, d) = box_dims(upper);
        assert_abs_diff_eq!(w, 15.0 * 0.7);
        assert_abs_diff_eq!(h, 6.0);
        assert_abs_diff_eq!(d, 12.0 * 0.6);
        assert_abs_diff_eq!(upper.position.x, 15.0 * 0.3);
        assert_abs_diff_eq!(upper.position.y, 12.0 + 3.0);

        let single = compose("modern single storey villa", 7);
        assert_eq!(single.named("upper_block").count(), 0);
    }

    #[test]
    fn rajasthani_stacks_and_domes_without_extra_roof() {
        let scene = compose("a rajasthani haveli", 3);
        assert_eq!(scene.named("ground_structure").count(), 1);
        assert_eq!(scene.named("upper_structure").count(), 1);
        assert_eq!(scene.named("dome").count(), 1);
        assert_eq!(scene.named("roof").count(), 0);
        assert_eq!(scene.count_kind(PrimitiveKind::Sphere), 1);

        let dome = scene.named("dome").next().unwrap();
        assert_eq!(dome.color.hex, "#DAA520");
        // haveli base 16 wide, 10 high at two floors
        assert_abs_diff_eq!(dome.position.y, 10.0 + 16.0 * 0.2);
    }

    #[test]
    fn rajasthani_ignores_explicit_roof_phrases() {
        for text in [
            "a rajasthani haveli with a flat roof",
            "a rajasthani haveli with a sloped roof",
            "a rajasthani haveli with a gabled roof",
            "a rajasthani haveli with a dome",
        ] {
            let scene = compose(text, 1);
            assert_eq!(scene.metadata.style, Style::Rajasthani, "{text}");
            assert_eq!(scene.named("roof").count(), 0, "{text}");
            assert_eq!(scene.named("dome_roof").count(), 0, "{text}");
            assert_eq!(scene.count_kind(PrimitiveKind::Sphere), 1, "{text}");
        }
    }

    #[test]
    fn huge_plots_stay_finite() {
        let text = format!("a mansion on a 1{} x 10 m plot with a garden", "0".repeat(308));
        let scene = compose(&text, 1);
        assert!(scene.named("tree_").count() > 0);
        let fp = scene.metadata.footprint;
        for value in [fp.min_x, fp.max_x, fp.min_z, fp.max_z] {
            assert!(value.is_finite());
        }
        for primitive in &scene.primitives {
            let p = &primitive.position;
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
            if let Shape::Box { width, height, depth } = primitive.shape {
                assert!(width.is_finite() && height.is_finite() && depth.is_finite());
            }
        }
    }

    #[test]
    fn flat_roof_is_a_slab_with_margin() {
        let scene = compose("a modern bungalow with a flat roof", 0);
        let roof = scene.named("roof").next().unwrap();
        let (w, h, d) = box_dims(roof);
        assert_abs_diff_eq!(w, 12.5);
        assert_abs_diff_eq!(h, 0.3);
        assert_abs_diff_eq!(d, 10.5);
        assert_eq!(roof.color.hex, "#708090");
    }

    #[test]
    fn pitched_roofs_are_pyramids() {
        let scene = compose("a traditional cottage", 0);
        let roof = scene.named("roof").next().unwrap();
        assert_eq!(roof.kind(), PrimitiveKind::Pyramid);
        assert_eq!(roof.color.hex, "#DC143C");
        match roof.shape {
            Shape::Pyramid { radius, height } => {
                assert_abs_diff_eq!(radius, 8.0 * 0.7);
                assert_abs_diff_eq!(height, 2.5);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn dome_roof_without_structural_dome_adds_sphere() {
        let scene = compose("a kerala cottage with a dome", 0);
        assert_eq!(scene.named("dome_roof").count(), 1);
        assert_eq!(scene.named("roof").count(), 0);
    }

    #[test]
    fn windows_are_capped_per_floor() {
        // villa is 15 wide: floor(15 / 3) = 5, capped at 4
        let scene = compose("a kerala villa, 3 floors", 0);
        assert_eq!(scene.named("window_").count(), 12);

        // cottage is 8 wide: two per floor
        let scene = compose("a kerala cottage, 2 floors", 0);
        assert_eq!(scene.named("window_").count(), 4);

        let window = scene.named("window_1_0").next().unwrap();
        let fh = 6.0 / 2.0;
        assert_abs_diff_eq!(window.position.y, fh + fh * 0.6);
        assert_abs_diff_eq!(window.position.x, -4.0 + 8.0 / 3.0);
        assert_abs_diff_eq!(window.position.z, 4.05);
    }

    #[test]
    fn door_stays_within_bounds() {
        for seed in 0..32 {
            let scene = compose("a house", seed);
            let (w, h, _) = box_dims(scene.named("door").next().unwrap());
            assert!((1.0..=1.5).contains(&w));
            assert!((2.0..=2.5).contains(&h));
        }
    }

    #[test]
    fn bungalow_boxes_are_capped() {
        let scene = compose("a kerala bungalow, 4 floors", 0);
        for p in &scene.primitives {
            if let Shape::Box { height, .. } = p.shape {
                assert!(height <= 4.0);
            }
        }
    }

    #[test]
    fn mansions_are_scaled_up() {
        let scene = compose("a kerala mansion", 0);
        let main = scene.named("main_structure").next().unwrap();
        let (w, h, d) = box_dims(main);
        assert_abs_diff_eq!(w, 20.0 * 1.2);
        assert_abs_diff_eq!(h, 15.0 * 1.3);
        assert_abs_diff_eq!(d, 18.0);
    }

    #[test]
    fn metadata_summarizes_scene() {
        let scene = compose("a house", 99);
        assert_eq!(scene.metadata.object_count, scene.primitives.len());
        assert_eq!(scene.metadata.seed, 99);
        assert_eq!(scene.metadata.style, Style::Modern);
        assert_eq!(scene.metadata.base_dimensions, "12.0x10.0x4.0");
        assert!(scene.metadata.footprint.width() >= 12.0);
    }

    #[test]
    fn composes_unclamped_records() {
        let mut record = record("a house");
        record.floors = 0;
        record.dimensions.width = -5.0;
        let scene = SceneComposer::new().compose(&record, 1);
        assert!(scene.metadata.floor_height > 0.0);
        assert!(scene.metadata.footprint.width() > 0.0);
    }
}
