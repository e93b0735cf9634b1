use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::assist;
use crate::editor::document::{
    CertificationField, EducationField, ExperienceField, LanguageField, PersonalField,
    ResumeDocument, SectionKind,
};
use crate::editor::session::EditorSession;
use crate::errors::AppError;
use crate::render::{render, RenderedResume};
use crate::state::AppState;
use crate::store;

/// Document snapshot returned by every session read/mutation so the client
/// can stay in sync with the revision counter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub session_id: Uuid,
    pub revision: u64,
    pub document: ResumeDocument,
}

impl DocumentResponse {
    fn from_session(session: &EditorSession) -> Self {
        Self {
            session_id: session.id,
            revision: session.revision,
            document: session.document.clone(),
        }
    }
}

/// Authenticates the caller, checks session ownership, then runs one closure
/// against the locked session and returns the fresh snapshot.
async fn with_session(
    state: &AppState,
    headers: &HeaderMap,
    id: Uuid,
    f: impl FnOnce(&mut EditorSession),
) -> Result<Json<DocumentResponse>, AppError> {
    let auth_session = state.auth.require_session(headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let mut s = session.lock().await;
    f(&mut s);
    Ok(Json(DocumentResponse::from_session(&s)))
}

// ────────────────────────────────────────────────────────────────────────────
// Session lifecycle
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    /// Stored resume to edit; a blank document when absent.
    pub resume_id: Option<Uuid>,
}

/// POST /api/v1/sessions
pub async fn handle_open_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<OpenSessionRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;

    let document = match req.resume_id {
        Some(resume_id) => store::get_resume(&state.db, resume_id, auth_session.user_id)
            .await?
            .map(|row| row.content.0)
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?,
        None => ResumeDocument::default(),
    };

    let id = state
        .sessions
        .open(auth_session.user_id, req.resume_id, document)
        .await;
    let session = state.sessions.get(id).await?;
    let s = session.lock().await;
    Ok(Json(DocumentResponse::from_session(&s)))
}

/// GET /api/v1/sessions/:id/document
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |_| {}).await
}

/// DELETE /api/v1/sessions/:id — discards the in-memory document.
pub async fn handle_close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    state.sessions.get_owned(id, auth_session.user_id).await?;
    if state.sessions.close(id).await {
        Ok(Json(serde_json::json!({ "closed": true })))
    } else {
        Err(AppError::NotFound(format!("Editor session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/save — persists the document to its record.
pub async fn handle_save_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let (resume_id, user_id, document) = {
        let s = session.lock().await;
        let resume_id = s.resume_id.ok_or_else(|| {
            AppError::Validation(
                "This session is not linked to a stored resume; create one first".to_string(),
            )
        })?;
        (resume_id, s.user_id, s.document.clone())
    };

    let saved = store::save_resume(&state.db, resume_id, user_id, &document).await?;
    if !saved {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    Ok(Json(serde_json::json!({ "saved": true })))
}

// ────────────────────────────────────────────────────────────────────────────
// Section mutations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PersonalUpdate {
    pub field: PersonalField,
    pub value: String,
}

/// POST /api/v1/sessions/:id/personal
pub async fn handle_set_personal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<PersonalUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.set_personal_field(req.field, &req.value))
    })
    .await
}

/// POST /api/v1/sessions/:id/sections/:section/entries
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((id, section)): Path<(Uuid, SectionKind)>,
    headers: HeaderMap,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| s.mutate(|d| d.add_entry(section))).await
}

/// DELETE /api/v1/sessions/:id/sections/:section/entries/:index
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, section, index)): Path<(Uuid, SectionKind, usize)>,
    headers: HeaderMap,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| s.mutate(|d| d.remove_entry(section, index))).await
}

#[derive(Debug, Deserialize)]
pub struct ExperienceUpdate {
    pub field: ExperienceField,
    pub value: String,
}

/// PATCH /api/v1/sessions/:id/experience/:index
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
    Json(req): Json<ExperienceUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.update_experience(index, req.field, &req.value))
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct EducationUpdate {
    pub field: EducationField,
    pub value: String,
}

/// PATCH /api/v1/sessions/:id/education/:index
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
    Json(req): Json<EducationUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.update_education(index, req.field, &req.value))
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct CertificationUpdate {
    pub field: CertificationField,
    pub value: String,
}

/// PATCH /api/v1/sessions/:id/certifications/:index
pub async fn handle_update_certification(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
    Json(req): Json<CertificationUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.update_certification(index, req.field, &req.value))
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct LanguageUpdate {
    pub field: LanguageField,
    pub value: String,
}

/// PATCH /api/v1/sessions/:id/languages/:index
pub async fn handle_update_language(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
    Json(req): Json<LanguageUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.update_language(index, req.field, &req.value))
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct AchievementsUpdate {
    pub achievements: Vec<String>,
}

/// PUT /api/v1/sessions/:id/experience/:index/achievements
pub async fn handle_set_experience_achievements(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
    Json(req): Json<AchievementsUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.set_experience_achievements(index, req.achievements))
    })
    .await
}

/// PUT /api/v1/sessions/:id/education/:index/achievements
pub async fn handle_set_education_achievements(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
    Json(req): Json<AchievementsUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.set_education_achievements(index, req.achievements))
    })
    .await
}

/// POST /api/v1/sessions/:id/skills/:category/items
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path((id, category)): Path<(Uuid, String)>,
    headers: HeaderMap,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| s.mutate(|d| d.add_skill(&category))).await
}

#[derive(Debug, Deserialize)]
pub struct SkillUpdate {
    pub value: String,
}

/// PATCH /api/v1/sessions/:id/skills/:category/items/:index
pub async fn handle_update_skill(
    State(state): State<AppState>,
    Path((id, category, index)): Path<(Uuid, String, usize)>,
    headers: HeaderMap,
    Json(req): Json<SkillUpdate>,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| {
        s.mutate(|d| d.update_skill(&category, index, &req.value))
    })
    .await
}

/// DELETE /api/v1/sessions/:id/skills/:category/items/:index
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((id, category, index)): Path<(Uuid, String, usize)>,
    headers: HeaderMap,
) -> Result<Json<DocumentResponse>, AppError> {
    with_session(&state, &headers, id, |s| s.mutate(|d| d.remove_skill(&category, index))).await
}

// ────────────────────────────────────────────────────────────────────────────
// AI-assisted operations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistTextResponse {
    pub result: String,
    pub revision: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistListResponse {
    pub result: Vec<String>,
    pub revision: u64,
}

/// POST /api/v1/sessions/:id/assist/summary
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<AssistTextResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let result = assist::generate_summary(&session, state.genai.as_ref()).await?;
    let revision = session.lock().await.revision;
    Ok(Json(AssistTextResponse { result, revision }))
}

/// POST /api/v1/sessions/:id/assist/experience/:index/description
pub async fn handle_improve_description(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
) -> Result<Json<AssistTextResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let result = assist::improve_description(&session, state.genai.as_ref(), index).await?;
    let revision = session.lock().await.revision;
    Ok(Json(AssistTextResponse { result, revision }))
}

/// POST /api/v1/sessions/:id/assist/skills
pub async fn handle_suggest_skills(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<AssistListResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let result = assist::suggest_skills(&session, state.genai.as_ref()).await?;
    let revision = session.lock().await.revision;
    Ok(Json(AssistListResponse { result, revision }))
}

/// POST /api/v1/sessions/:id/assist/experience/:index/achievements
pub async fn handle_generate_achievements(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    headers: HeaderMap,
) -> Result<Json<AssistListResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let result = assist::generate_achievements(&session, state.genai.as_ref(), index).await?;
    let revision = session.lock().await.revision;
    Ok(Json(AssistListResponse { result, revision }))
}

// ────────────────────────────────────────────────────────────────────────────
// Change notification
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChangeQuery {
    /// Revision the caller has already rendered.
    #[serde(default)]
    pub since: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeResponse {
    pub revision: u64,
}

/// GET /api/v1/sessions/:id/changes?since=N
///
/// Long-polls the session's revision channel until the document has moved
/// past `since`. Preview clients subscribe here to re-render reactively.
pub async fn handle_await_change(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ChangeQuery>,
    headers: HeaderMap,
) -> Result<Json<ChangeResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let mut rx = session.lock().await.subscribe();

    loop {
        let revision = *rx.borrow_and_update();
        if revision > query.since {
            return Ok(Json(ChangeResponse { revision }));
        }
        // Sender dropped means the session was closed under us.
        rx.changed()
            .await
            .map_err(|_| AppError::NotFound(format!("Editor session {id} was closed")))?;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Preview
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub revision: u64,
    pub preview: RenderedResume,
}

/// GET /api/v1/sessions/:id/preview — re-renders from the current document.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<PreviewResponse>, AppError> {
    let auth_session = state.auth.require_session(&headers).await?;
    let session = state.sessions.get_owned(id, auth_session.user_id).await?;
    let s = session.lock().await;
    Ok(Json(PreviewResponse {
        revision: s.revision,
        preview: render(&s.document),
    }))
}
