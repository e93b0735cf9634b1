//! Identity/Session Provider — wraps the external GoTrue-style auth service.
//!
//! Authentication protocol internals stay delegated: this module only signs
//! users up, resolves bearer tokens to sessions, and broadcasts session
//! changes observed through this process. No credential material is stored.

use axum::http::HeaderMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::errors::AppError;

pub mod handlers;
pub mod password;

/// The authenticated session as seen by the rest of the app.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
}

/// Session change notifications, mirroring the provider's auth-state events.
#[derive(Debug, Clone)]
pub enum SessionChange {
    SignedUp { user_id: Uuid },
    SignedIn { user_id: Uuid },
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: String,
}

#[derive(Debug, Deserialize)]
struct SignUpResponse {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(alias = "msg", alias = "error_description")]
    message: Option<String>,
}

/// Client wrapper for the external identity service.
#[derive(Clone)]
pub struct AuthProvider {
    client: Client,
    base_url: String,
    anon_key: String,
    changes: broadcast::Sender<SessionChange>,
}

impl AuthProvider {
    pub fn new(base_url: String, anon_key: String) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            client: Client::new(),
            base_url,
            anon_key,
            changes,
        }
    }

    /// Subscribes to session change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    /// Registers a new account with the identity service.
    /// Password policy is enforced by the caller before this is reached.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(AppError::Auth(format!("sign-up rejected ({status}): {message}")));
        }

        let user: SignUpResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let _ = self.changes.send(SessionChange::SignedUp { user_id: user.id });
        Ok(user.id)
    }

    /// Resolves a bearer token to the current session, or `None` when the
    /// token is missing, expired or unknown to the provider.
    pub async fn get_session(&self, access_token: &str) -> Result<Option<Session>, AppError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!("session lookup failed ({status}): {body}")));
        }

        let user: ProviderUser = response
            .json()
            .await
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let session = Session {
            user_id: user.id,
            email: user.email,
        };
        let _ = self.changes.send(SessionChange::SignedIn { user_id: session.user_id });
        Ok(Some(session))
    }

    /// Extracts the bearer token from request headers and resolves it,
    /// rejecting the request when no valid session exists.
    pub async fn require_session(&self, headers: &HeaderMap) -> Result<Session, AppError> {
        let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
        self.get_session(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(
            axum::http::header::AUTHORIZATION,
            "Bearer abc123".parse().unwrap(),
        );
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(axum::http::header::AUTHORIZATION, "Basic xyz".parse().unwrap());
        assert!(bearer_token(&headers).is_none());
    }
}
