// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Track Record: Spotify listening-stats dashboard gateway
//!
//! This crate signs users in with Spotify, keeps their access token fresh
//! inside a signed session cookie, and relays dashboard requests to the
//! analytics backend.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{BackendClient, SessionService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub session_service: SessionService,
    pub backend: BackendClient,
}

impl AppState {
    /// Wire up services from configuration.
    pub fn new(config: Config) -> Self {
        let spotify = services::SpotifyClient::new(&config);
        let session_service = SessionService::new(spotify, config.session_secret.clone());
        let backend = BackendClient::new(config.backend_url.clone());

        Self {
            config,
            session_service,
            backend,
        }
    }
}
