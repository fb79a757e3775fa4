//! Scene graph of parametric primitives produced by the composer.

use serde::{Deserialize, Serialize};

use super::attributes::{HouseType, Style};

/// Primitive kind, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Box,
    Cylinder,
    Pyramid,
    Sphere,
}

/// Shape parameters. A pyramid's `radius` is the half-span of its square base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    Box { width: f64, height: f64, depth: f64 },
    Cylinder { radius: f64, height: f64 },
    Pyramid { radius: f64, height: f64 },
    Sphere { radius: f64 },
}

impl Shape {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Shape::Box { .. } => PrimitiveKind::Box,
            Shape::Cylinder { .. } => PrimitiveKind::Cylinder,
            Shape::Pyramid { .. } => PrimitiveKind::Pyramid,
            Shape::Sphere { .. } => PrimitiveKind::Sphere,
        }
    }

    /// Half extents on the ground plane (x, z).
    pub fn half_extents(&self) -> (f64, f64) {
        match *self {
            Shape::Box { width, depth, .. } => (width / 2.0, depth / 2.0),
            Shape::Cylinder { radius, .. }
            | Shape::Pyramid { radius, .. }
            | Shape::Sphere { radius } => (radius, radius),
        }
    }
}

/// Center of a primitive; `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Resolved color, both as hex and as normalized RGB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    pub hex: String,
    pub rgb: [f64; 3],
}

impl ColorValue {
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            hex: format!("#{:02X}{:02X}{:02X}", r, g, b),
            rgb: [r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePrimitive {
    pub name: String,
    pub shape: Shape,
    pub position: Position,
    /// Surface tag, e.g. `brick`, `glass`, `water`.
    pub material: String,
    pub color: ColorValue,
}

impl ScenePrimitive {
    pub fn kind(&self) -> PrimitiveKind {
        self.shape.kind()
    }
}

/// Ground-plane bounds of all primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Footprint {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMetadata {
    pub object_count: usize,
    pub footprint: Footprint,
    pub style: Style,
    pub house_type: HouseType,
    pub seed: u64,
    pub floor_height: f64,
    /// `"<width>x<depth>x<height>"` with one decimal.
    pub base_dimensions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub primitives: Vec<ScenePrimitive>,
    pub metadata: SceneMetadata,
}

impl Scene {
    pub fn count_kind(&self, kind: PrimitiveKind) -> usize {
        self.primitives.iter().filter(|p| p.kind() == kind).count()
    }

    /// Primitives whose name starts with `prefix`.
    pub fn named<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ScenePrimitive> + 'a {
        self.primitives
            .iter()
            .filter(move |p| p.name.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_value_formats_hex() {
        let color = ColorValue::from_rgb8(0x87, 0xCE, 0xEB);
        assert_eq!(color.hex, "#87CEEB");
        assert!((color.rgb[0] - 135.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn shape_serializes_with_type_tag() {
        let shape = Shape::Sphere { radius: 2.0 };
        let json = serde_json::to_value(shape).unwrap();
        assert_eq!(json["type"], "sphere");
        assert_eq!(json["radius"], 2.0);
    }
}
