//! Application configuration loaded from environment variables.
//!
//! Secrets (OAuth client secret, JWT signing key) are read once at startup
//! and cached in memory. On Cloud Run they are injected as environment
//! variables via secret bindings.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Frontend URL for OAuth redirects
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,

    // --- Search provider credentials (all optional; providers degrade) ---
    /// TMDB read access token (movie/TV search)
    pub tmdb_read_access_token: Option<String>,
    /// Twitch client ID for IGDB (game search)
    pub igdb_client_id: Option<String>,
    /// Twitch access token for IGDB (game search)
    pub igdb_access_token: Option<String>,
    /// Google Books API key (book search)
    pub google_books_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            // Falls back to the JWT key so local setups need only one secret.
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map(String::into_bytes)
                .or_else(|_| {
                    env::var("JWT_SIGNING_KEY")
                        .map(String::into_bytes)
                        .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))
                })?,

            tmdb_read_access_token: env::var("TMDB_READ_ACCESS_TOKEN")
                .ok()
                .map(|v| v.trim().to_string()),
            igdb_client_id: env::var("IGDB_CLIENT_ID").ok(),
            igdb_access_token: env::var("IGDB_ACCESS_TOKEN").ok(),
            google_books_key: env::var("GOOGLE_BOOKS_KEY").ok(),
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_client_id".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            google_client_secret: "test_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_oauth_state_key".to_vec(),
            tmdb_read_access_token: None,
            igdb_client_id: None,
            igdb_access_token: None,
            google_books_key: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
