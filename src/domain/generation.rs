//! Request and response DTOs for the parse and generate endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::attributes::{AttributeRecord, HouseType, Style};
use super::scene::Scene;
use crate::error::ValidationError;

/// Optional fields that short-circuit the matching classifier or extractor.
///
/// Raw strings are kept so that an unknown value can be logged and ignored
/// instead of failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floors: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_type: Option<String>,
}

impl Overrides {
    pub fn style(&self) -> Option<Style> {
        let raw = self.style.as_deref()?;
        let parsed = Style::parse(raw);
        if parsed.is_none() {
            tracing::warn!(style = raw, "Ignoring unknown style override");
        }
        parsed
    }

    pub fn house_type(&self) -> Option<HouseType> {
        let raw = self.house_type.as_deref()?;
        let parsed = HouseType::parse(raw);
        if parsed.is_none() {
            tracing::warn!(house_type = raw, "Ignoring unknown house type override");
        }
        parsed
    }

    /// Floor override, only when it already lies inside the valid range.
    pub fn floors(&self) -> Option<u8> {
        let raw = self.floors?;
        let min = super::attributes::MIN_FLOORS as i64;
        let max = super::attributes::MAX_FLOORS as i64;
        if (min..=max).contains(&raw) {
            Some(raw as u8)
        } else {
            tracing::warn!(floors = raw, "Ignoring out-of-range floors override");
            None
        }
    }
}

/// Body for `POST /parse`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseRequest {
    pub description: String,
    #[serde(flatten)]
    pub overrides: Overrides,
}

/// Body for `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub description: String,
    #[serde(flatten)]
    pub overrides: Overrides,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Trims the description and enforces the length bound.
pub fn validate_description(description: &str, max_chars: usize) -> Result<&str, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    let actual = trimmed.chars().count();
    if actual > max_chars {
        return Err(ValidationError::DescriptionTooLong {
            max: max_chars,
            actual,
        });
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub seed: u64,
}

/// Paths of the documents written for one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFiles {
    pub scene: String,
    pub metadata: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub model_id: String,
    pub attributes: AttributeRecord,
    pub scene: Scene,
    pub metadata: GenerationMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<GeneratedFiles>,
    pub warnings: Vec<String>,
    pub cached: bool,
}

/// Canned description offered by `GET /generate/examples`.
#[derive(Debug, Clone, Serialize)]
pub struct ExampleDescription {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const EXAMPLES: &[ExampleDescription] = &[
    ExampleDescription {
        id: "kerala",
        title: "Kerala courtyard home",
        description: "A traditional kerala house with a central courtyard, sloped tile roof, \
                      wooden pillars and a garden, 2 floors, east facing",
    },
    ExampleDescription {
        id: "rajasthani",
        title: "Rajasthani haveli",
        description: "A grand rajasthani haveli in sandstone with jali screens, arches, \
                      a dome and a fountain in the courtyard, 3 floors",
    },
    ExampleDescription {
        id: "modern",
        title: "Modern villa",
        description: "A modern 2 floor villa with large windows, glass and concrete, \
                      a swimming pool, parking and a garden, 40x60 feet",
    },
    ExampleDescription {
        id: "colonial",
        title: "Colonial bungalow",
        description: "A colonial bungalow with white pillars, a veranda, brick walls, \
                      hipped roof and a compound wall, 4 bedrooms",
    },
];

pub fn find_example(id: &str) -> Option<&'static ExampleDescription> {
    EXAMPLES.iter().find(|example| example.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_and_long_descriptions() {
        assert_eq!(
            validate_description("   ", 10),
            Err(ValidationError::EmptyDescription)
        );
        assert_eq!(
            validate_description("a very long house", 5),
            Err(ValidationError::DescriptionTooLong { max: 5, actual: 17 })
        );
        assert_eq!(validate_description("  villa ", 10), Ok("villa"));
    }

    #[test]
    fn overrides_ignore_invalid_values() {
        let overrides = Overrides {
            style: Some("gothic".into()),
            floors: Some(9),
            house_type: Some("Row House".into()),
        };
        assert_eq!(overrides.style(), None);
        assert_eq!(overrides.floors(), None);
        assert_eq!(overrides.house_type(), Some(HouseType::RowHouse));
    }

    #[test]
    fn generate_request_reads_flattened_overrides() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"description":"a house","style":"kerala","floors":3,"seed":7}"#,
        )
        .unwrap();
        assert_eq!(req.overrides.style(), Some(Style::Kerala));
        assert_eq!(req.overrides.floors(), Some(3));
        assert_eq!(req.seed, Some(7));
    }

    #[test]
    fn examples_are_addressable_by_id() {
        assert_eq!(EXAMPLES.len(), 4);
        assert!(find_example("colonial").is_some());
        assert!(find_example("gothic").is_none());
    }
}
