//! Read-only catalog endpoints: canned examples, tag vocabularies and a
//! configuration summary.

use axum::{extract::State, response::IntoResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::domain::generation::EXAMPLES;
use crate::domain::{Color, Feature, HouseType, Material, RoofType, Room, Style};

#[derive(Debug, Serialize)]
pub struct StyleCatalog {
    pub styles: Vec<StyleEntry>,
    pub house_types: &'static [HouseType],
    pub roof_types: &'static [RoofType],
    pub rooms: &'static [Room],
    pub features: &'static [Feature],
    pub materials: &'static [Material],
    pub colors: &'static [Color],
}

/// A style together with what it falls back to when the text is silent.
#[derive(Debug, Serialize)]
pub struct StyleEntry {
    pub style: Style,
    pub default_roof: Option<RoofType>,
    pub default_materials: Vec<Material>,
    pub default_colors: Vec<Color>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub environment: &'static str,
    pub keyword_table: String,
    pub styles: usize,
    pub house_types: usize,
    pub max_description_chars: usize,
    pub collaborators: Collaborators,
}

#[derive(Debug, Serialize)]
pub struct Collaborators {
    pub cache: bool,
    pub embeddings: bool,
    pub renderer: Option<String>,
    pub output_dir: Option<String>,
}

/// GET /generate/examples
pub async fn examples() -> impl IntoResponse {
    DataResponse::new(EXAMPLES)
}

/// GET /styles
pub async fn styles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let styles = Style::ALL
        .iter()
        .map(|style| {
            let profile = state.keywords.style(*style);
            StyleEntry {
                style: *style,
                default_roof: profile.roof,
                default_materials: profile.default_materials.clone(),
                default_colors: profile.default_colors.clone(),
            }
        })
        .collect();

    DataResponse::new(StyleCatalog {
        styles,
        house_types: HouseType::ALL,
        roof_types: RoofType::ALL,
        rooms: Room::ALL,
        features: Feature::ALL,
        materials: Material::ALL,
        colors: Color::ALL,
    })
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    DataResponse::new(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        environment: state.settings.env.as_str(),
        keyword_table: state.keyword_source.clone(),
        styles: Style::ALL.len(),
        house_types: HouseType::ALL.len(),
        max_description_chars: state.settings.max_description_chars,
        collaborators: Collaborators {
            cache: state.cache.is_some(),
            embeddings: state.embeddings.is_some(),
            renderer: state
                .renderer
                .as_ref()
                .map(|renderer| renderer.executable().to_string()),
            output_dir: state
                .outputs
                .as_ref()
                .map(|store| store.dir().display().to_string()),
        },
    })
}
