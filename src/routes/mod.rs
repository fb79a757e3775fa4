pub mod catalog;
pub mod generate;
pub mod health;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/status", get(catalog::status))
        .route("/styles", get(catalog::styles))
        // Extraction and generation
        .route("/parse", post(generate::parse))
        .route("/generate", post(generate::generate))
        .route("/generate/examples", get(catalog::examples))
        .route("/generate/example/:id", post(generate::generate_example))
}
