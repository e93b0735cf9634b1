use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::job::ExportStatus;
use crate::export::{build_pdf, export_filename, IMAGE_QUALITY, MARGIN_PT, RASTER_SCALE};
use crate::render::render;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStartResponse {
    pub job_id: Uuid,
}

/// POST /api/v1/sessions/:id/export — starts a PDF export job.
///
/// The job always resolves through the tri-state status channel: a missing
/// session or a failed assembly lands as `failed`, never as an uncaught error.
pub async fn handle_start_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ExportStartResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    state.sessions.get_owned(id, auth_session.user_id).await?;

    let job_id = state.export_jobs.start().await;
    info!(
        "Export {job_id} started (letter page, {}pt margin, scale {RASTER_SCALE}, quality {IMAGE_QUALITY})",
        MARGIN_PT
    );
    let jobs = state.export_jobs.clone();
    let sessions = state.sessions.clone();

    tokio::spawn(async move {
        // The session can still be closed between the ownership check above
        // and this read; that race lands as a failed job.
        let rendered = match sessions.get(id).await {
            Ok(session) => {
                let s = session.lock().await;
                render(&s.document)
            }
            Err(_) => {
                jobs.fail(job_id, "Preview target not found".to_string()).await;
                return;
            }
        };

        match build_pdf(&rendered) {
            Ok(bytes) => {
                let filename = export_filename();
                info!("Export {job_id} finished: {filename} ({} bytes)", bytes.len());
                jobs.complete(job_id, filename, bytes.into()).await;
            }
            Err(e) => {
                error!("Export {job_id} failed: {e}");
                jobs.fail(job_id, "Failed to export resume".to_string()).await;
            }
        }
    });

    Ok(Json(ExportStartResponse { job_id }))
}

/// GET /api/v1/export/:job_id — the job's lifecycle state.
pub async fn handle_export_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ExportStatus>, AppError> {
    state
        .export_jobs
        .status(job_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Export job {job_id} not found")))
}

/// DELETE /api/v1/export/:job_id — drops the job record. Failed jobs are
/// cleaned up here; successful ones evict themselves on download.
pub async fn handle_delete_export(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.export_jobs.remove(job_id).await {
        Ok(Json(serde_json::json!({ "deleted": true })))
    } else {
        Err(AppError::NotFound(format!("Export job {job_id} not found")))
    }
}

/// GET /api/v1/export/:job_id/download — the finished PDF bytes. One-shot:
/// the job record is dropped once its payload is handed out.
pub async fn handle_export_download(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (filename, bytes) = state
        .export_jobs
        .download(job_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Export job {job_id} has no file")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
