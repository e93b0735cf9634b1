use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::store;

/// GET /api/v1/resumes — the authenticated user's resumes, newest first.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    let session = state.auth.require_session(&headers).await?;
    let records = store::list_resumes(&state.db, session.user_id).await?;
    Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub title: String,
}

/// POST /api/v1/resumes — creates an empty resume record.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateResumeRequest>,
) -> Result<Json<ResumeRecord>, AppError> {
    let session = state.auth.require_session(&headers).await?;
    if req.title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    let record = store::create_resume(&state.db, session.user_id, &req.title).await?;
    Ok(Json(record))
}
