//! Document Store Adapter — the only module that touches the `resumes` table.
//!
//! The store is consulted to list, create, load and save records; it never
//! participates in editing logic. Documents are stored whole as JSONB.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::editor::document::ResumeDocument;
use crate::models::resume::{ResumeRecord, ResumeRow};

pub mod handlers;

/// Lists a user's resumes, newest first.
pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRecord>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRecord>(
        "SELECT id, title, created_at FROM resumes \
         WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Creates a resume record seeded with an empty default document.
pub async fn create_resume(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
) -> Result<ResumeRecord, sqlx::Error> {
    sqlx::query_as::<_, ResumeRecord>(
        "INSERT INTO resumes (id, user_id, title, content, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, now(), now()) \
         RETURNING id, title, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(Json(ResumeDocument::default()))
    .fetch_one(pool)
    .await
}

/// Loads one resume scoped to its owner.
pub async fn get_resume(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT id, user_id, title, content, created_at, updated_at \
         FROM resumes WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Writes an edited document back to its record. Returns false when no
/// record matched (unknown id or wrong owner).
pub async fn save_resume(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    document: &ResumeDocument,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE resumes SET content = $3, updated_at = now() \
         WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .bind(Json(document))
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
