use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Connection pool size; `DB_MAX_CONNECTIONS`, defaults to 10.
    pub db_max_connections: u32,
    /// Base URL of the external identity service (GoTrue-style REST API).
    pub auth_url: String,
    /// Public ("anon") API key sent with every identity-service request.
    pub auth_anon_key: String,
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: optional_env_u32("DB_MAX_CONNECTIONS", 10)?,
            auth_url: require_env("AUTH_URL")?,
            auth_anon_key: require_env("AUTH_ANON_KEY")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env_u32(key: &str, default: u32) -> Result<u32> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u32>()
            .with_context(|| format!("'{key}' must be a positive integer")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_env_u32_defaults_when_unset() {
        assert_eq!(optional_env_u32("RB_TEST_POOL_UNSET", 10).unwrap(), 10);
    }

    #[test]
    fn test_optional_env_u32_parses_and_rejects() {
        std::env::set_var("RB_TEST_POOL_SIZE", "25");
        assert_eq!(optional_env_u32("RB_TEST_POOL_SIZE", 10).unwrap(), 25);
        std::env::set_var("RB_TEST_POOL_SIZE", "many");
        assert!(optional_env_u32("RB_TEST_POOL_SIZE", 10).is_err());
        std::env::remove_var("RB_TEST_POOL_SIZE");
    }
}
