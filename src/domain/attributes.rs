//! Attribute record produced by text extraction.
//!
//! Every category is a closed enum. Declaration order is the canonical order
//! used for tie-breaking and for iteration over keyword tables, so variants
//! must not be reordered casually.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const MIN_FLOORS: u8 = 1;
pub const MAX_FLOORS: u8 = 5;
pub const DEFAULT_FLOORS: u8 = 2;

/// Smallest extent any resolved dimension may take, in meters.
pub const MIN_DIMENSION: f64 = 1.0;
/// Largest extent any resolved dimension may take, in meters.
pub const MAX_DIMENSION: f64 = 500.0;

macro_rules! tag_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $tag:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in canonical order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }

            /// Lenient parse: case-insensitive, spaces and dashes read as underscores.
            pub fn parse(value: &str) -> Option<Self> {
                let normalized = value.trim().to_lowercase().replace([' ', '-'], "_");
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == normalized)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

tag_enum!(
    /// Architectural style.
    Style {
        Modern => "modern",
        Traditional => "traditional",
        Colonial => "colonial",
        Contemporary => "contemporary",
        Kerala => "kerala",
        Rajasthani => "rajasthani",
        Bengali => "bengali",
        SouthIndian => "south_indian",
        Gujarati => "gujarati",
        Punjabi => "punjabi",
        Maharashtrian => "maharashtrian",
        Kashmiri => "kashmiri",
    }
);

tag_enum!(
    /// Building typology.
    HouseType {
        Bungalow => "bungalow",
        Villa => "villa",
        Duplex => "duplex",
        RowHouse => "row_house",
        Haveli => "haveli",
        Cottage => "cottage",
        Farmhouse => "farmhouse",
        Apartment => "apartment",
        Mansion => "mansion",
        Palace => "palace",
        Penthouse => "penthouse",
    }
);

tag_enum!(
    RoofType {
        Flat => "flat",
        Sloped => "sloped",
        Gabled => "gabled",
        Hipped => "hipped",
        Mansard => "mansard",
        Dome => "dome",
    }
);

tag_enum!(
    Room {
        Bedroom => "bedroom",
        LivingRoom => "living_room",
        Kitchen => "kitchen",
        Bathroom => "bathroom",
        DiningRoom => "dining_room",
        Balcony => "balcony",
        Terrace => "terrace",
        PujaRoom => "puja_room",
        Courtyard => "courtyard",
        Veranda => "veranda",
        Garage => "garage",
        Study => "study",
        GuestRoom => "guest_room",
        ServantQuarter => "servant_quarter",
        StoreRoom => "store_room",
    }
);

tag_enum!(
    Feature {
        Pillars => "pillars",
        Arches => "arches",
        Dome => "dome",
        Jali => "jali",
        Courtyard => "courtyard",
        Fountain => "fountain",
        Garden => "garden",
        Gate => "gate",
        CompoundWall => "compound_wall",
        Parking => "parking",
        SwimmingPool => "swimming_pool",
        TerraceGarden => "terrace_garden",
        Balcony => "balcony",
        SolarPanels => "solar_panels",
    }
);

tag_enum!(
    /// Building material. The first entry of a record's list is the primary one.
    Material {
        Brick => "brick",
        Concrete => "concrete",
        Wood => "wood",
        Stone => "stone",
        Marble => "marble",
        Granite => "granite",
        Tile => "tile",
        Glass => "glass",
        Steel => "steel",
        Mud => "mud",
        Terracotta => "terracotta",
        Sandstone => "sandstone",
        Laterite => "laterite",
        Limestone => "limestone",
        Bamboo => "bamboo",
    }
);

tag_enum!(
    Color {
        White => "white",
        Cream => "cream",
        Beige => "beige",
        Brown => "brown",
        Red => "red",
        Yellow => "yellow",
        Orange => "orange",
        Pink => "pink",
        Blue => "blue",
        Green => "green",
        Grey => "grey",
        Black => "black",
        Golden => "golden",
        Silver => "silver",
        Sandstone => "sandstone",
        Terracotta => "terracotta",
        Ochre => "ochre",
    }
);

tag_enum!(
    Orientation {
        North => "north",
        South => "south",
        East => "east",
        West => "west",
    }
);

tag_enum!(
    QualityIndicator {
        Luxury => "luxury",
        Simple => "simple",
        Modern => "modern",
        Traditional => "traditional",
    }
);

/// Building envelope in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    /// Extent along the depth axis.
    pub length: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    /// Returns a copy with every extent held within
    /// [`MIN_DIMENSION`]..=[`MAX_DIMENSION`]. NaN collapses to the minimum.
    pub fn clamped(self) -> Self {
        Self {
            width: clamp_extent(self.width),
            length: clamp_extent(self.length),
            height: clamp_extent(self.height),
        }
    }
}

fn clamp_extent(value: f64) -> f64 {
    if value.is_nan() {
        MIN_DIMENSION
    } else {
        value.clamp(MIN_DIMENSION, MAX_DIMENSION)
    }
}

/// Classifier certainty per classified field, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScores {
    pub style: f64,
    pub house_type: f64,
}

/// Structured description of a house, constructed once per input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    /// Original description.
    pub text: String,
    pub style: Style,
    pub house_type: HouseType,
    pub floors: u8,
    pub roof_type: RoofType,
    pub rooms: BTreeSet<Room>,
    pub features: BTreeSet<Feature>,
    pub materials: Vec<Material>,
    pub colors: Vec<Color>,
    pub dimensions: Dimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    pub quality_indicators: BTreeSet<QualityIndicator>,
    pub confidence: ConfidenceScores,
}

impl AttributeRecord {
    pub fn primary_material(&self) -> Material {
        self.materials.first().copied().unwrap_or(Material::Concrete)
    }

    pub fn primary_color(&self) -> Color {
        self.colors.first().copied().unwrap_or(Color::White)
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn has_room(&self, room: Room) -> bool {
        self.rooms.contains(&room)
    }
}

/// Clamps any integer floor count into `[MIN_FLOORS, MAX_FLOORS]`.
pub fn clamp_floors(value: u64) -> u8 {
    value.clamp(MIN_FLOORS as u64, MAX_FLOORS as u64) as u8
}
