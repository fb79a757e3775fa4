//! Pattern-based extraction of counts, sizes, budget and orientation.
//!
//! Every function here is total: anything that does not match yields its
//! default (or `None`) instead of an error.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::{clamp_floors, Orientation, DEFAULT_FLOORS};

const FEET_TO_METERS: f64 = 0.3048;
const SQFT_TO_SQM: f64 = 0.092903;
/// Length/width ratio used when only an area is known.
const AREA_ELONGATION: f64 = 1.2;

/// How a floor pattern turns its capture into a floor count.
#[derive(Debug, Clone, Copy)]
enum FloorRule {
    /// The captured number is the floor count.
    Count,
    /// Ground floor plus the captured number of upper floors.
    GroundPlus,
    Fixed(u64),
    /// Half the BHK figure, kept within one to three floors.
    Bhk,
}

// Ordered: the first pattern that matches decides.
static FLOOR_PATTERNS: LazyLock<Vec<(Regex, FloorRule)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"\b(\d+)\s*-?\s*(?:floors?|stor(?:e?ys?|ies)|levels?)\b").unwrap(),
            FloorRule::Count,
        ),
        (
            Regex::new(r"\b(?:g|ground)\s*\+\s*(\d+)").unwrap(),
            FloorRule::GroundPlus,
        ),
        (
            Regex::new(r"\b(?:single|one)[\s-]*(?:floors?|stor(?:e?ys?|ies)|levels?)\b").unwrap(),
            FloorRule::Fixed(1),
        ),
        (
            Regex::new(r"\b(?:double|two)[\s-]*(?:floors?|stor(?:e?ys?|ies)|levels?)\b|\bduplex\b")
                .unwrap(),
            FloorRule::Fixed(2),
        ),
        (
            Regex::new(r"\b(?:triple|three)[\s-]*(?:floors?|stor(?:e?ys?|ies)|levels?)\b").unwrap(),
            FloorRule::Fixed(3),
        ),
        (Regex::new(r"\b(\d+)\s*bhk\b").unwrap(), FloorRule::Bhk),
    ]
});

static BEDROOMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)\s*-?\s*(?:bed\s?rooms?|beds?|bhk)\b").unwrap()
});

static BATHROOMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+)\s*-?\s*(?:bath\s?rooms?|baths?|toilets?|washrooms?)\b").unwrap()
});

static PLOT_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d+(?:\.\d+)?)\s*(?:x|×|by|\*)\s*(\d+(?:\.\d+)?)\s*(feet|foot|ft|meters?|metres?|m)?\b",
    )
    .unwrap()
});

static SQUARE_FEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:sq\.?\s*(?:ft|feet)|square\s*(?:feet|foot|ft)|sqft)\b")
        .unwrap()
});

static SQUARE_METERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:,\d{3})*(?:\.\d+)?)\s*(?:sq\.?\s*m(?:eters?|etres?)?|square\s*m(?:eters?|etres?)|sqm)\b")
        .unwrap()
});

static MENTIONS_FEET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:feet|foot|ft|sqft)\b").unwrap());

static BUDGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:₹|rs\.?|inr)?\s*(\d+(?:\.\d+)?)\s*(lakhs?|lacs?|crores?|cr)\b").unwrap()
});

static ORIENTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(north|south|east|west)[\s-]*facing\b|\bfacing\s+(?:the\s+)?(north|south|east|west)\b",
    )
    .unwrap()
});

/// Everything the numeric extractor could read from one description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericFacts {
    pub floors: u8,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    /// Explicit `(width, length)` in meters.
    pub dimensions_hint: Option<(f64, f64)>,
    pub budget: Option<String>,
    pub orientation: Option<Orientation>,
}

/// Runs every numeric rule over normalized (lowercased) text.
pub fn extract(text: &str) -> NumericFacts {
    NumericFacts {
        floors: floors(text),
        bedrooms: count(&BEDROOMS, text),
        bathrooms: count(&BATHROOMS, text),
        dimensions_hint: dimensions_hint(text),
        budget: budget(text),
        orientation: orientation(text),
    }
}

pub fn floors(text: &str) -> u8 {
    for (pattern, rule) in FLOOR_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let captured = caps.get(1).map(|m| parse_count(m.as_str()));
        let raw = match (rule, captured) {
            (FloorRule::Count, Some(n)) => n,
            (FloorRule::GroundPlus, Some(n)) => n.saturating_add(1),
            (FloorRule::Fixed(n), _) => *n,
            (FloorRule::Bhk, Some(n)) => (n / 2).clamp(1, 3),
            _ => continue,
        };
        return clamp_floors(raw);
    }
    DEFAULT_FLOORS
}

fn count(pattern: &Regex, text: &str) -> Option<u32> {
    let caps = pattern.captures(text)?;
    let n = parse_count(caps.get(1)?.as_str());
    Some(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Digit runs only overflow, never fail otherwise.
fn parse_count(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

/// Explicit plot size, else a size derived from a floor area.
///
/// A `W x L` figure without a unit is read as feet when the description
/// talks in feet anywhere, otherwise as meters.
pub fn dimensions_hint(text: &str) -> Option<(f64, f64)> {
    if let Some(caps) = PLOT_SIZE.captures(text) {
        let width = parse_decimal(caps.get(1)?.as_str())?;
        let length = parse_decimal(caps.get(2)?.as_str())?;
        let in_feet = match caps.get(3).map(|m| m.as_str()) {
            Some("feet" | "foot" | "ft") => true,
            Some(_) => false,
            None => MENTIONS_FEET.is_match(text),
        };
        let scale = if in_feet { FEET_TO_METERS } else { 1.0 };
        return Some((width * scale, length * scale));
    }

    let area = SQUARE_FEET
        .captures(text)
        .and_then(|caps| parse_decimal(caps.get(1)?.as_str()))
        .map(|sqft| sqft * SQFT_TO_SQM)
        .or_else(|| {
            SQUARE_METERS
                .captures(text)
                .and_then(|caps| parse_decimal(caps.get(1)?.as_str()))
        })?;

    let width = area.sqrt();
    Some((width, width * AREA_ELONGATION))
}

pub fn budget(text: &str) -> Option<String> {
    let caps = BUDGET.captures(text)?;
    let amount = caps.get(1)?.as_str();
    let unit = if caps.get(2)?.as_str().starts_with('c') {
        "crores"
    } else {
        "lakhs"
    };
    Some(format!("{amount} {unit}"))
}

pub fn orientation(text: &str) -> Option<Orientation> {
    let caps = ORIENTATION.captures(text)?;
    let direction = caps.get(1).or_else(|| caps.get(2))?;
    Orientation::parse(direction.as_str())
}
