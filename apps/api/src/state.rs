use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::AuthProvider;
use crate::editor::session::SessionRegistry;
use crate::export::job::ExportJobs;
use crate::genai::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable content-generation backend. Production: GenAiClient.
    pub genai: Arc<dyn TextGenerator>,
    pub auth: AuthProvider,
    /// In-memory editor sessions. Documents live here for the duration of an
    /// editing session and are only persisted through an explicit save.
    pub sessions: Arc<SessionRegistry>,
    /// Export job registry — tracks the in-progress/succeeded/failed lifecycle
    /// of PDF exports and holds finished bytes for download.
    pub export_jobs: Arc<ExportJobs>,
}
