// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard data routes.
//!
//! Each route relays one backend call with the session's access token and
//! returns the normalized result. Backend failures are part of the body,
//! never an HTTP error; only a dead session produces a 401.

use crate::error::{AppError, Result};
use crate::middleware::Session;
use crate::models::backend::{
    AudioFeatures, DiscoverWeekly, RecentlyPlayed, Recommendations, TokenAck, TopArtists,
    TopGenres, TopTracks,
};
use crate::models::{BackendResult, QuickStats};
use crate::services::top_moods_from_genres;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Upper bound on track ids per audio-features lookup.
const MAX_TRACK_IDS: u64 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/dashboard/token", post(sync_token))
        .route("/api/dashboard/top-tracks", get(top_tracks))
        .route("/api/dashboard/top-artists", get(top_artists))
        .route("/api/dashboard/top-genres", get(top_genres))
        .route("/api/dashboard/recently-played", get(recently_played))
        .route("/api/dashboard/recommendations", get(recommendations))
        .route("/api/dashboard/audio-features", post(audio_features))
        .route("/api/dashboard/discover-weekly", get(discover_weekly))
        .route("/api/dashboard/quick-stats", get(quick_stats))
        .route("/api/dashboard/moods", get(moods))
}

/// Push the current access token to the backend.
async fn sync_token(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BackendResult<TokenAck>>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.send_token_to_backend(token).await))
}

async fn top_tracks(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BackendResult<TopTracks>>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.fetch_top_tracks(token).await))
}

async fn top_artists(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BackendResult<TopArtists>>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.fetch_top_artists(token).await))
}

async fn top_genres(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BackendResult<TopGenres>>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.fetch_top_genres(token).await))
}

async fn recently_played(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BackendResult<RecentlyPlayed>>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.fetch_recently_played(token).await))
}

async fn recommendations(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<BackendResult<Recommendations>>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.fetch_recommendations(token).await))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AudioFeaturesRequest {
    #[validate(length(min = 1, max = MAX_TRACK_IDS))]
    track_ids: Vec<String>,
}

/// Audio features for a set of tracks; `null` when the backend call fails.
async fn audio_features(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(body): Json<AudioFeaturesRequest>,
) -> Result<Json<Option<AudioFeatures>>> {
    body.validate()
        .map_err(|e| AppError::BadRequest(format!("Invalid 'track_ids': {}", e)))?;

    let token = session.access_token()?;
    Ok(Json(
        state.backend.fetch_audio_features(token, &body.track_ids).await,
    ))
}

/// Discover Weekly playlist; `null` when the backend call fails.
async fn discover_weekly(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Option<DiscoverWeekly>>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.fetch_discover_weekly(token).await))
}

async fn quick_stats(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<QuickStats>> {
    let token = session.access_token()?;
    Ok(Json(state.backend.get_quick_stats(token).await))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MoodsResponse {
    pub moods: Vec<String>,
}

/// Top moods derived from the listener's top genres.
async fn moods(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<MoodsResponse>> {
    let token = session.access_token()?;

    let genres = match state.backend.fetch_top_genres(token).await {
        BackendResult::Data(genres) => Some(genres.names()),
        BackendResult::Error(e) => {
            tracing::warn!(error = %e, "Top genres unavailable for mood classification");
            None
        }
    };

    Ok(Json(MoodsResponse {
        moods: top_moods_from_genres(genres.as_deref()),
    }))
}
