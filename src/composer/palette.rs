//! Fixed color palette.

use crate::domain::{Color, ColorValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch(pub u8, pub u8, pub u8);

impl Swatch {
    pub fn value(self) -> ColorValue {
        ColorValue::from_rgb8(self.0, self.1, self.2)
    }
}

pub const WINDOW: Swatch = Swatch(0x87, 0xCE, 0xEB);
pub const DOOR: Swatch = Swatch(0x8B, 0x45, 0x13);
pub const FLAT_ROOF: Swatch = Swatch(0x70, 0x80, 0x90);
pub const PITCHED_ROOF: Swatch = Swatch(0x8B, 0x45, 0x13);
pub const CLAY_ROOF: Swatch = Swatch(0xDC, 0x14, 0x3C);
pub const DOME: Swatch = Swatch(0xDA, 0xA5, 0x20);
pub const POOL: Swatch = Swatch(0x00, 0x80, 0xFF);
pub const PARKING: Swatch = Swatch(0xC0, 0xC0, 0xC0);
pub const TRUNK: Swatch = Swatch(0x8B, 0x45, 0x13);
pub const CANOPY: Swatch = Swatch(0x22, 0x8B, 0x22);
pub const PILLAR: Swatch = Swatch(0xF5, 0xF5, 0xF5);
pub const BOUNDARY_WALL: Swatch = Swatch(0xA9, 0xA9, 0xA9);
pub const PAVING: Swatch = Swatch(0xD2, 0xB4, 0x8C);

/// Palette entry for an extracted color tag.
pub fn swatch(color: Color) -> Swatch {
    match color {
        Color::White => Swatch(0xFF, 0xFF, 0xFF),
        Color::Cream => Swatch(0xFF, 0xFD, 0xD0),
        Color::Beige => Swatch(0xF5, 0xF5, 0xDC),
        Color::Brown => Swatch(0x8B, 0x5A, 0x2B),
        Color::Red => Swatch(0xB2, 0x22, 0x22),
        Color::Yellow => Swatch(0xF4, 0xD0, 0x3F),
        Color::Orange => Swatch(0xFF, 0x8C, 0x00),
        Color::Pink => Swatch(0xFF, 0xC0, 0xCB),
        Color::Blue => Swatch(0x46, 0x82, 0xB4),
        Color::Green => Swatch(0x22, 0x8B, 0x22),
        Color::Grey => Swatch(0x80, 0x80, 0x80),
        Color::Black => Swatch(0x2F, 0x2F, 0x2F),
        Color::Golden => Swatch(0xDA, 0xA5, 0x20),
        Color::Silver => Swatch(0xC0, 0xC0, 0xC0),
        Color::Sandstone => Swatch(0xC2, 0xB2, 0x80),
        Color::Terracotta => Swatch(0xE2, 0x72, 0x5B),
        Color::Ochre => Swatch(0xCC, 0x77, 0x22),
    }
}
