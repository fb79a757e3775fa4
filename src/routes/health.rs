use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub cache: String,
    pub embeddings: String,
    pub renderer: String,
}

const OK: &str = "ok";
const ERROR: &str = "error";
const DISABLED: &str = "disabled";

/// Health check endpoint
///
/// Every collaborator is optional, so the service itself is always able to
/// answer; a failing collaborator only degrades the status.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    // Check all services in parallel
    let (cache_status, embeddings_status) = tokio::join!(
        async {
            match &state.cache {
                Some(cache) if cache.health_check().await.is_ok() => OK,
                Some(_) => ERROR,
                None => DISABLED,
            }
        },
        async {
            match &state.embeddings {
                Some(client) if client.health_check().await.is_ok() => OK,
                Some(_) => ERROR,
                None => DISABLED,
            }
        },
    );

    let renderer_status = match &state.renderer {
        Some(renderer) if renderer.is_available() => OK,
        Some(_) => ERROR,
        None => DISABLED,
    };

    let degraded = [cache_status, embeddings_status, renderer_status].contains(&ERROR);
    let status = if degraded { "degraded" } else { "healthy" };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                cache: cache_status.to_string(),
                embeddings: embeddings_status.to_string(),
                renderer: renderer_status.to_string(),
            },
        }),
    )
}
