//! Extraction and generation endpoints.
//!
//! Both run the same pure pipeline; the optional collaborators (embeddings,
//! cache, output store, renderer) only add to it and never fail a request.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::api::response::DataResponse;
use crate::app::AppState;
use crate::composer::SceneComposer;
use crate::domain::generation::{
    find_example, validate_description, GenerateRequest, GenerateResponse, GenerationMetadata,
    Overrides, ParseRequest,
};
use crate::domain::AttributeRecord;
use crate::error::{ApiError, ApiResult};
use crate::extraction::{AttributeExtractor, NoSemantics, SemanticScorer};
use crate::middleware::RequestIdExt;
use crate::services::cache::keys;
use crate::services::embeddings::classifier_phrases;
use crate::services::output_store;
use crate::services::EmbeddingSimilarity;

/// Extract attributes from a description.
///
/// POST /parse
pub async fn parse(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> ApiResult<impl IntoResponse> {
    let description = validate_description(&req.description, state.settings.max_description_chars)?;
    let record = extract(&state, description, &req.overrides).await;

    debug!(
        request_id = ?headers.request_id(),
        style = %record.style,
        house_type = %record.house_type,
        "Parsed description"
    );

    Ok(DataResponse::new(record))
}

/// Extract attributes and compose a scene.
///
/// POST /generate
pub async fn generate(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = run_generation(
        &state,
        &req.description,
        &req.overrides,
        req.seed,
        headers.request_id(),
    )
    .await?;
    Ok(DataResponse::new(response))
}

/// Generate from one of the canned descriptions.
///
/// POST /generate/example/:id
pub async fn generate_example(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let example =
        find_example(&id).ok_or_else(|| ApiError::NotFound(format!("Example '{id}' not found")))?;

    let response = run_generation(
        &state,
        example.description,
        &Overrides::default(),
        None,
        headers.request_id(),
    )
    .await?;
    Ok(DataResponse::new(response))
}

/// Runs extraction with the embedding term when the collaborator answers.
async fn extract(state: &AppState, description: &str, overrides: &Overrides) -> AttributeRecord {
    let similarity = semantic_scores(state, description).await;
    let semantics: &dyn SemanticScorer = match &similarity {
        Some(similarity) => similarity,
        None => &NoSemantics,
    };
    AttributeExtractor::new(&state.keywords).extract(description, overrides, semantics)
}

async fn semantic_scores(state: &AppState, description: &str) -> Option<EmbeddingSimilarity> {
    let client = state.embeddings.as_ref()?;
    let phrases = classifier_phrases(&state.keywords);
    match client.similarity_for(description, &phrases).await {
        Ok(similarity) => Some(similarity),
        Err(e) => {
            warn!(error = %e, "Embedding service unavailable - classifying without semantic term");
            None
        }
    }
}

pub(crate) async fn run_generation(
    state: &AppState,
    description: &str,
    overrides: &Overrides,
    seed: Option<u64>,
    request_id: Option<&str>,
) -> ApiResult<GenerateResponse> {
    let started = Instant::now();
    let description = validate_description(description, state.settings.max_description_chars)?;

    // Only seeded requests are reproducible, so only those are cached
    let cache_key = match (&state.cache, seed) {
        (Some(_), Some(seed)) => Some(keys::generation(description, overrides, seed)),
        _ => None,
    };
    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Some(cached) = cache.get::<GenerateResponse>(key).await {
            debug!(request_id = ?request_id, key = %key, "Returning cached generation");
            return Ok(GenerateResponse {
                cached: true,
                ..cached
            });
        }
    }

    let seed = seed.unwrap_or_else(rand::random);
    let record = extract(state, description, overrides).await;
    let scene = SceneComposer::new().compose(&record, seed);

    let generated_at = Utc::now();
    let model_id = output_store::model_id(description, generated_at);
    let mut warnings = Vec::new();

    let files = match &state.outputs {
        Some(store) => match store
            .write(&model_id, &record, &scene, seed, generated_at)
            .await
        {
            Ok(files) => Some(files),
            Err(e) => {
                warn!(request_id = ?request_id, error = ?e, "Failed to persist generation outputs");
                warnings.push(format!("outputs were not saved: {e}"));
                None
            }
        },
        None => None,
    };

    if let Some(renderer) = &state.renderer {
        match &state.outputs {
            Some(store) if files.is_some() => {
                if let Err(warning) = renderer.render(&store.scene_path(&model_id)).await {
                    warn!(request_id = ?request_id, %warning, "Render step failed");
                    warnings.push(warning.to_string());
                }
            }
            _ => warnings.push("rendering skipped: no scene document was written".to_string()),
        }
    }

    let response = GenerateResponse {
        model_id,
        attributes: record,
        scene,
        metadata: GenerationMetadata {
            generated_at,
            processing_time_ms: started.elapsed().as_millis() as u64,
            seed,
        },
        files,
        warnings,
        cached: false,
    };

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Err(e) = cache.set(key, &response).await {
            warn!(error = %e, "Failed to cache generation");
        }
    }

    info!(
        request_id = ?request_id,
        model_id = %response.model_id,
        objects = response.scene.metadata.object_count,
        seed,
        elapsed_ms = response.metadata.processing_time_ms,
        "Generated scene"
    );

    Ok(response)
}
