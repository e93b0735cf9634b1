use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::{check_password, PasswordCheck};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub requirements: PasswordCheck,
}

/// POST /api/v1/auth/register
///
/// Applies the password acceptability gate before delegating sign-up to the
/// identity provider. A rejected password reports the full requirement
/// checklist so the client can render it.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    if req.email.is_empty() {
        return Err(AppError::Validation("Email address is required".to_string()));
    }

    let requirements = check_password(&req.password);
    if !requirements.acceptable() {
        let mut missing = Vec::new();
        if !requirements.min_length {
            missing.push("at least 8 characters");
        }
        if !requirements.has_digit {
            missing.push("a number");
        }
        if !requirements.has_uppercase {
            missing.push("an uppercase letter");
        }
        if !requirements.has_special {
            missing.push("a special character");
        }
        let message = if missing.is_empty() {
            "Password is too easy to guess".to_string()
        } else {
            format!("Password must contain {}", missing.join(", "))
        };
        return Err(AppError::Validation(message));
    }

    let user_id = state.auth.sign_up(&req.email, &req.password).await?;
    Ok(Json(RegisterResponse {
        user_id,
        requirements,
    }))
}
