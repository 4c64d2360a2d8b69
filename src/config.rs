// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Every secret is read once at startup. A missing required variable is a
//! deployment mistake and stops the server before it binds.

use std::env;

/// Spotify authorization endpoint.
pub const SPOTIFY_AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";
/// Spotify token endpoint (code exchange and refresh).
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Scopes requested at sign-in.
pub const SPOTIFY_SCOPES: &str =
    "user-read-email user-top-read user-read-recently-played user-read-private";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Spotify OAuth client ID (public)
    pub spotify_client_id: String,
    /// Base URL of the analytics backend proxy
    pub backend_url: String,
    /// Frontend URL for OAuth redirects
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Authorization endpoint (overridable for tests)
    pub spotify_authorize_url: String,
    /// Token endpoint (overridable for tests)
    pub spotify_token_url: String,

    // --- Secrets ---
    /// Spotify OAuth client secret
    pub spotify_client_secret: String,
    /// Signing key for session cookies and OAuth state (raw bytes)
    pub session_secret: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            backend_url: required("BACKEND_URL")?
                .trim_end_matches('/')
                .to_string(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            spotify_authorize_url: env::var("SPOTIFY_AUTHORIZE_URL")
                .unwrap_or_else(|_| SPOTIFY_AUTHORIZE_URL.to_string()),
            spotify_token_url: env::var("SPOTIFY_TOKEN_URL")
                .unwrap_or_else(|_| SPOTIFY_TOKEN_URL.to_string()),

            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            session_secret: required("SESSION_SECRET")?.into_bytes(),
        })
    }

    /// Config for tests only; points every remote at localhost.
    pub fn test_default() -> Self {
        Self {
            spotify_client_id: "test_client_id".to_string(),
            backend_url: "http://127.0.0.1:9".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            spotify_authorize_url: SPOTIFY_AUTHORIZE_URL.to_string(),
            spotify_token_url: "http://127.0.0.1:9/api/token".to_string(),
            spotify_client_secret: "test_secret".to_string(),
            session_secret: b"test_session_key_32_bytes_min!!!".to_vec(),
        }
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
