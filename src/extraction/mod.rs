//! Text to [`AttributeRecord`] extraction.
//!
//! Extraction is total: every field that the description does not mention
//! resolves to a documented default, so this module has no error type of its
//! own beyond [`TableError`] for loading custom keyword tables.

pub mod classifier;
pub mod dimensions;
pub mod keywords;
pub mod numeric;
pub mod resolver;

pub use classifier::{NoSemantics, SemanticScorer};
pub use keywords::{KeywordTable, TableError};

use tracing::{debug, instrument};

use crate::domain::generation::Overrides;
use crate::domain::{AttributeRecord, ConfidenceScores};

/// Confidence attached to a field set through an override.
const OVERRIDE_CONFIDENCE: f64 = 1.0;

/// Turns descriptions into attribute records using one keyword table.
#[derive(Debug, Clone, Copy)]
pub struct AttributeExtractor<'t> {
    table: &'t KeywordTable,
}

impl<'t> AttributeExtractor<'t> {
    pub fn new(table: &'t KeywordTable) -> Self {
        Self { table }
    }

    /// Extracts without overrides or semantic scoring.
    pub fn extract_text(&self, text: &str) -> AttributeRecord {
        self.extract(text, &Overrides::default(), &NoSemantics)
    }

    #[instrument(skip_all, fields(chars = text.len()))]
    pub fn extract(
        &self,
        text: &str,
        overrides: &Overrides,
        semantics: &dyn SemanticScorer,
    ) -> AttributeRecord {
        let table = self.table;
        let normalized = keywords::normalize_text(text);
        let facts = numeric::extract(&normalized);

        let (style, style_confidence) = match overrides.style() {
            Some(style) => (style, OVERRIDE_CONFIDENCE),
            None => {
                let c = classifier::classify_style(&normalized, table, semantics);
                (c.value, c.confidence)
            }
        };

        let (house_type, house_type_confidence) = match overrides.house_type() {
            Some(house_type) => (house_type, OVERRIDE_CONFIDENCE),
            None => {
                let c = classifier::classify_house_type(&normalized, table, semantics);
                (c.value, c.confidence)
            }
        };

        let floors = overrides.floors().unwrap_or(facts.floors);

        let record = AttributeRecord {
            text: text.trim().to_string(),
            style,
            house_type,
            floors,
            roof_type: resolver::roof_type(&normalized, table, style),
            rooms: resolver::rooms(&normalized, table, facts.bedrooms, facts.bathrooms),
            features: resolver::features(&normalized, table),
            materials: resolver::materials(&normalized, table, style),
            colors: resolver::colors(&normalized, table, style),
            dimensions: dimensions::resolve(table, house_type, floors, facts.dimensions_hint),
            bedrooms: facts.bedrooms,
            bathrooms: facts.bathrooms,
            budget: facts.budget,
            orientation: facts.orientation,
            quality_indicators: resolver::quality_indicators(&normalized, table),
            confidence: ConfidenceScores {
                style: style_confidence,
                house_type: house_type_confidence,
            },
        };

        debug!(
            style = %record.style,
            house_type = %record.house_type,
            floors = record.floors,
            roof = %record.roof_type,
            rooms = record.rooms.len(),
            features = record.features.len(),
            "Extracted attributes"
        );

        record
    }
}
