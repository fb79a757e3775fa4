use anyhow::Result;

use housegen_backend::{app, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting house generation backend"
    );

    // Create application state
    let state = app::AppState::from_settings(settings.clone()).await?;

    tracing::info!(
        keyword_table = %state.keyword_source,
        cache = state.cache.is_some(),
        embeddings = state.embeddings.is_some(),
        renderer = state.renderer.is_some(),
        persist_outputs = state.outputs.is_some(),
        "Collaborators configured"
    );

    // Optionally check embedding service health (non-blocking)
    if let Some(client) = state.embeddings.clone() {
        tokio::spawn(async move {
            match client.health_check().await {
                Ok(()) => tracing::info!("Embedding service is healthy"),
                Err(e) => tracing::warn!(error = %e, "Embedding service health check failed - will retry on first request"),
            }
        });
    }

    if let Some(renderer) = &state.renderer {
        if !renderer.is_available() {
            tracing::warn!(executable = renderer.executable(), "Renderer executable not found - renders will report warnings");
        }
    }

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
