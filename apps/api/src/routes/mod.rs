pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::editor::handlers as editor_handlers;
use crate::export::handlers as export_handlers;
use crate::state::AppState;
use crate::store::handlers as store_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Registration
        .route("/api/v1/auth/register", post(auth_handlers::handle_register))
        // Stored resumes
        .route(
            "/api/v1/resumes",
            get(store_handlers::handle_list_resumes).post(store_handlers::handle_create_resume),
        )
        // Editor sessions
        .route("/api/v1/sessions", post(editor_handlers::handle_open_session))
        .route(
            "/api/v1/sessions/:id",
            delete(editor_handlers::handle_close_session),
        )
        .route(
            "/api/v1/sessions/:id/document",
            get(editor_handlers::handle_get_document),
        )
        .route(
            "/api/v1/sessions/:id/save",
            post(editor_handlers::handle_save_session),
        )
        // Section mutations
        .route(
            "/api/v1/sessions/:id/personal",
            post(editor_handlers::handle_set_personal),
        )
        .route(
            "/api/v1/sessions/:id/sections/:section/entries",
            post(editor_handlers::handle_add_entry),
        )
        .route(
            "/api/v1/sessions/:id/sections/:section/entries/:index",
            delete(editor_handlers::handle_remove_entry),
        )
        .route(
            "/api/v1/sessions/:id/experience/:index",
            patch(editor_handlers::handle_update_experience),
        )
        .route(
            "/api/v1/sessions/:id/experience/:index/achievements",
            put(editor_handlers::handle_set_experience_achievements),
        )
        .route(
            "/api/v1/sessions/:id/education/:index",
            patch(editor_handlers::handle_update_education),
        )
        .route(
            "/api/v1/sessions/:id/education/:index/achievements",
            put(editor_handlers::handle_set_education_achievements),
        )
        .route(
            "/api/v1/sessions/:id/certifications/:index",
            patch(editor_handlers::handle_update_certification),
        )
        .route(
            "/api/v1/sessions/:id/languages/:index",
            patch(editor_handlers::handle_update_language),
        )
        .route(
            "/api/v1/sessions/:id/skills/:category/items",
            post(editor_handlers::handle_add_skill),
        )
        .route(
            "/api/v1/sessions/:id/skills/:category/items/:index",
            patch(editor_handlers::handle_update_skill)
                .delete(editor_handlers::handle_remove_skill),
        )
        // AI-assisted operations
        .route(
            "/api/v1/sessions/:id/assist/summary",
            post(editor_handlers::handle_generate_summary),
        )
        .route(
            "/api/v1/sessions/:id/assist/skills",
            post(editor_handlers::handle_suggest_skills),
        )
        .route(
            "/api/v1/sessions/:id/assist/experience/:index/description",
            post(editor_handlers::handle_improve_description),
        )
        .route(
            "/api/v1/sessions/:id/assist/experience/:index/achievements",
            post(editor_handlers::handle_generate_achievements),
        )
        // Preview & export
        .route(
            "/api/v1/sessions/:id/changes",
            get(editor_handlers::handle_await_change),
        )
        .route(
            "/api/v1/sessions/:id/preview",
            get(editor_handlers::handle_preview),
        )
        .route(
            "/api/v1/sessions/:id/export",
            post(export_handlers::handle_start_export),
        )
        .route(
            "/api/v1/export/:job_id",
            get(export_handlers::handle_export_status)
                .delete(export_handlers::handle_delete_export),
        )
        .route(
            "/api/v1/export/:job_id/download",
            get(export_handlers::handle_export_download),
        )
        .with_state(state)
}
