//! Per-style stage parameters.
//!
//! The stage pipeline is fixed; a style only changes the data it runs with.

use crate::domain::Style;

use super::palette::{self, Swatch};

/// How the structure stage builds the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// One full-height box.
    Block,
    /// Full-height box plus a recessed block on top when there is more than one floor.
    RecessedUpper,
    /// Ground box at 70% height, narrower upper box, and a dome above.
    StackedWithDome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRules {
    pub envelope: Envelope,
    pub pitched_roof_color: Swatch,
    /// Corner pillars even when the description does not ask for them.
    pub corner_pillars: bool,
}

impl StyleRules {
    const DEFAULT: StyleRules = StyleRules {
        envelope: Envelope::Block,
        pitched_roof_color: palette::PITCHED_ROOF,
        corner_pillars: false,
    };

    /// The envelope already carries a dome, so a dome roof adds nothing.
    pub fn has_structural_dome(&self) -> bool {
        self.envelope == Envelope::StackedWithDome
    }
}

pub fn rules_for(style: Style) -> StyleRules {
    match style {
        Style::Modern => StyleRules {
            envelope: Envelope::RecessedUpper,
            ..StyleRules::DEFAULT
        },
        Style::Rajasthani => StyleRules {
            envelope: Envelope::StackedWithDome,
            ..StyleRules::DEFAULT
        },
        Style::Traditional => StyleRules {
            pitched_roof_color: palette::CLAY_ROOF,
            ..StyleRules::DEFAULT
        },
        Style::Colonial => StyleRules {
            corner_pillars: true,
            ..StyleRules::DEFAULT
        },
        _ => StyleRules::DEFAULT,
    }
}
