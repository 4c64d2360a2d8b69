// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the analytics backend proxy.
//!
//! Every call is a single request with no retry. Failures never escape as
//! `Err`: list endpoints return [`BackendResult::Error`] with a fixed,
//! per-endpoint message, audio features and Discover Weekly return `None`,
//! and quick stats fall back to `"N/A"` placeholders. Logging is a side
//! channel only.

use crate::models::backend::{
    AudioFeatures, DiscoverWeekly, QuickStatsEnvelope, RecentlyPlayed, Recommendations,
    TokenAck, TopArtists, TopGenres, TopTracks,
};
use crate::models::{BackendResult, QuickStats};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Returned instead of a request when the caller has no token to send.
pub const MISSING_TOKEN: &str = "Missing access token";

/// How the access token travels to the backend.
enum Carriage<'a> {
    /// No credentials.
    None,
    /// `{"accessToken": ...}` JSON body.
    Body(&'a str),
    /// `Authorization: Bearer ...` header.
    Bearer(&'a str),
    /// Bearer header plus an endpoint-specific JSON body.
    BearerWithBody(&'a str, Value),
}

/// Analytics backend client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Connectivity probe against `/api/data`.
    pub async fn call_backend(&self) -> BackendResult<Value> {
        self.fetch(Method::GET, "/api/data", Carriage::None, |status| {
            format!("Backend responded with status {}", status)
        })
        .await
    }

    /// Hand the session's access token to the backend.
    pub async fn send_token_to_backend(&self, access_token: &str) -> BackendResult<TokenAck> {
        if access_token.is_empty() {
            return BackendResult::Error(MISSING_TOKEN.to_string());
        }
        self.fetch(Method::POST, "/api/token", Carriage::Body(access_token), |status| {
            format!("Backend responded with status {}", status)
        })
        .await
    }

    pub async fn fetch_top_tracks(&self, access_token: &str) -> BackendResult<TopTracks> {
        if access_token.is_empty() {
            return BackendResult::Error(MISSING_TOKEN.to_string());
        }
        self.fetch(
            Method::POST,
            "/api/top-tracks",
            Carriage::Bearer(access_token),
            |status| format!("Top tracks request failed: {}", status),
        )
        .await
    }

    pub async fn fetch_top_artists(&self, access_token: &str) -> BackendResult<TopArtists> {
        if access_token.is_empty() {
            return BackendResult::Error(MISSING_TOKEN.to_string());
        }
        self.fetch(
            Method::POST,
            "/api/top-artists",
            Carriage::Body(access_token),
            |status| format!("Top artists request failed: {}", status),
        )
        .await
    }

    pub async fn fetch_top_genres(&self, access_token: &str) -> BackendResult<TopGenres> {
        if access_token.is_empty() {
            return BackendResult::Error(MISSING_TOKEN.to_string());
        }
        self.fetch(
            Method::POST,
            "/api/top-genres",
            Carriage::Body(access_token),
            |status| format!("Top genres request failed: {}", status),
        )
        .await
    }

    pub async fn fetch_recently_played(
        &self,
        access_token: &str,
    ) -> BackendResult<RecentlyPlayed> {
        if access_token.is_empty() {
            return BackendResult::Error(MISSING_TOKEN.to_string());
        }
        self.fetch(
            Method::POST,
            "/api/recently-played",
            Carriage::Body(access_token),
            |status| format!("Recently played failed: {}", status),
        )
        .await
    }

    pub async fn fetch_recommendations(
        &self,
        access_token: &str,
    ) -> BackendResult<Recommendations> {
        if access_token.is_empty() {
            return BackendResult::Error(MISSING_TOKEN.to_string());
        }
        self.fetch(
            Method::POST,
            "/api/recommendations",
            Carriage::Body(access_token),
            |status| format!("Recommendations failed: {}", status),
        )
        .await
    }

    /// Audio features for the given tracks; `None` on any failure.
    pub async fn fetch_audio_features(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Option<AudioFeatures> {
        if access_token.is_empty() {
            return None;
        }
        let body = json!({ "track_ids": track_ids });
        self.fetch(
            Method::POST,
            "/api/audio-features",
            Carriage::BearerWithBody(access_token, body),
            |status| format!("Audio features request failed: {}", status),
        )
        .await
        .data()
    }

    /// The user's Discover Weekly playlist; `None` on any failure.
    pub async fn fetch_discover_weekly(&self, access_token: &str) -> Option<DiscoverWeekly> {
        if access_token.is_empty() {
            return None;
        }
        self.fetch(
            Method::POST,
            "/api/discover-weekly",
            Carriage::Bearer(access_token),
            |status| format!("Discover weekly request failed: {}", status),
        )
        .await
        .data()
    }

    /// Top track/artist/genre summary, `"N/A"` wherever unavailable.
    pub async fn get_quick_stats(&self, access_token: &str) -> QuickStats {
        if access_token.is_empty() {
            return QuickStats::default();
        }
        let result: BackendResult<QuickStatsEnvelope> = self
            .fetch(
                Method::POST,
                "/api/quick-stats",
                Carriage::Body(access_token),
                |status| format!("QuickStats failed: {}", status),
            )
            .await;

        result.data().map(QuickStats::from).unwrap_or_default()
    }

    fn request(&self, method: Method, path: &str, carriage: Carriage<'_>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));

        match carriage {
            Carriage::None => builder,
            Carriage::Body(token) => builder.json(&json!({ "accessToken": token })),
            Carriage::Bearer(token) => builder.bearer_auth(token),
            Carriage::BearerWithBody(token, body) => builder.bearer_auth(token).json(&body),
        }
    }

    /// Issue one request and normalize the outcome.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        carriage: Carriage<'_>,
        failure: impl FnOnce(u16) -> String,
    ) -> BackendResult<T> {
        let response = match self.request(method, path, carriage).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path, error = %e, "Backend request failed");
                return BackendResult::Error(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "Backend returned error status");
            return BackendResult::Error(failure(status.as_u16()));
        }

        match response.json::<T>().await {
            Ok(data) => BackendResult::Data(data),
            Err(e) => {
                tracing::warn!(path, error = %e, "Backend response could not be decoded");
                BackendResult::Error(e.to_string())
            }
        }
    }
}
