#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::editor::document::ResumeDocument;

/// Listing row for the dashboard: one stored resume per record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Full stored resume, including the document content as JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: Json<ResumeDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
