mod auth;
mod config;
mod db;
mod editor;
mod errors;
mod export;
mod genai;
mod models;
mod render;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::db::create_pool;
use crate::editor::session::SessionRegistry;
use crate::export::job::ExportJobs;
use crate::genai::GenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (errors on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize the content-generation client
    let genai = Arc::new(GenAiClient::new(config.gemini_api_key.clone()));
    info!("Generation client initialized (model: {})", genai::MODEL);

    // Initialize the identity provider wrapper
    let auth = AuthProvider::new(config.auth_url.clone(), config.auth_anon_key.clone());
    let mut session_events = auth.subscribe();
    tokio::spawn(async move {
        while let Ok(change) = session_events.recv().await {
            info!("Session change: {change:?}");
        }
    });

    // Build app state
    let state = AppState {
        db,
        genai,
        auth,
        sessions: Arc::new(SessionRegistry::new()),
        export_jobs: Arc::new(ExportJobs::new()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
