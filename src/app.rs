use anyhow::{Context, Result};
use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Settings;
use crate::extraction::KeywordTable;
use crate::middleware::request_id_layer;
use crate::routes;
use crate::services::{EmbeddingClient, OutputStore, RedisCache, SceneRenderer};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state
pub struct AppState {
    pub settings: Settings,
    pub keywords: Arc<KeywordTable>,
    /// Where the keyword table came from, for `/status`.
    pub keyword_source: String,
    pub cache: Option<RedisCache>,
    pub embeddings: Option<EmbeddingClient>,
    pub renderer: Option<SceneRenderer>,
    pub outputs: Option<OutputStore>,
}

impl AppState {
    /// State with the built-in keyword table and no external collaborators.
    pub fn new(settings: Settings) -> Arc<Self> {
        Arc::new(Self {
            settings,
            keywords: Arc::new(KeywordTable::builtin().clone()),
            keyword_source: "builtin".to_string(),
            cache: None,
            embeddings: None,
            renderer: None,
            outputs: None,
        })
    }

    /// Builds every collaborator the settings enable.
    ///
    /// A configured Redis that cannot be reached is logged and skipped; a bad
    /// keyword table or embedding client configuration fails start-up.
    pub async fn from_settings(settings: Settings) -> Result<Arc<Self>> {
        let (keywords, keyword_source) = match &settings.keyword_table_path {
            Some(path) => (
                KeywordTable::from_path(path).context("Failed to load keyword table")?,
                path.display().to_string(),
            ),
            None => (KeywordTable::builtin().clone(), "builtin".to_string()),
        };

        let cache = match &settings.redis_url {
            Some(url) => match RedisCache::new(url, settings.redis_cache_ttl_seconds).await {
                Ok(cache) => Some(cache),
                Err(e) => {
                    tracing::warn!(error = %e, "Redis unavailable - generation cache disabled");
                    None
                }
            },
            None => None,
        };

        let embeddings = settings
            .embedding_service_url
            .as_deref()
            .map(|url| {
                EmbeddingClient::new(
                    url,
                    &settings.embedding_service_token,
                    settings.embedding_timeout_seconds,
                )
            })
            .transpose()?;

        let renderer = settings.renderer_executable.as_ref().map(|exe| {
            SceneRenderer::new(
                exe.clone(),
                settings.renderer_args.clone(),
                settings.renderer_timeout_seconds,
            )
        });

        let outputs = settings
            .persist_outputs
            .then(|| OutputStore::new(settings.output_dir.clone()));

        Ok(Arc::new(Self {
            settings,
            keywords: Arc::new(keywords),
            keyword_source,
            cache,
            embeddings,
            renderer,
            outputs,
        }))
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(&state.settings);

    // Build trace layer (use DEBUG for spans to reduce overhead at INFO level)
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    // Request ID layers
    let (set_request_id, propagate_request_id) = request_id_layer();

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // In dev mode, use longer preflight cache to reduce OPTIONS requests
    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-request-id"),
        ]))
        .allow_credentials(true)
        .max_age(max_age)
}
