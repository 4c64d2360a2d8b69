// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Response shapes returned by the analytics backend proxy.
//!
//! Item payloads (tracks, artists, playlist entries) are owned by the
//! backend and passed through untouched as JSON values. Only the envelope
//! list fields are typed; a missing, `null` or non-list value reads as an
//! empty list. Fields not named here are kept in `extra` and serialized
//! back unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Normalized outcome of a backend call.
///
/// Serializes as `{"data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendResult<T> {
    Data(T),
    Error(String),
}

impl<T> BackendResult<T> {
    pub fn data(self) -> Option<T> {
        match self {
            BackendResult::Data(data) => Some(data),
            BackendResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BackendResult::Data(_) => None,
            BackendResult::Error(msg) => Some(msg),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BackendResult::Error(_))
    }
}

/// Acknowledgement from `/api/token`, kept exactly as the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenAck {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TokenAck {
    pub fn success(&self) -> bool {
        self.fields
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn received(&self) -> Option<&Value> {
        self.fields.get("received")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopTracks {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub top_tracks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopArtists {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub top_artists: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Genres come back either as bare strings or as `{"genre": ...}` objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopGenres {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub top_genres: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TopGenres {
    /// Genre names in backend order, skipping null entries.
    pub fn names(&self) -> Vec<String> {
        self.top_genres
            .iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name.clone()),
                Value::Object(obj) => obj.get("genre")?.as_str().map(str::to_string),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentlyPlayed {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub recently_played: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub recommendations: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub audio_features: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Discover Weekly playlist; `discover_weekly` is absent until Spotify has
/// generated one for the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoverWeekly {
    #[serde(default)]
    pub discover_weekly: Option<Playlist>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(default, deserialize_with = "list_or_empty")]
    pub items: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A list field that is `null` or not a list reads as empty.
fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

/// Placeholder shown wherever a quick stat is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// Condensed single-record summary shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct QuickStats {
    pub top_track: String,
    pub top_artist: String,
    pub top_genre: String,
}

impl Default for QuickStats {
    fn default() -> Self {
        Self {
            top_track: NOT_AVAILABLE.to_string(),
            top_artist: NOT_AVAILABLE.to_string(),
            top_genre: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Raw `/api/quick-stats` body: a one-element list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuickStatsEnvelope {
    #[serde(default)]
    pub quick_stats: Vec<RawQuickStats>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuickStats {
    #[serde(default)]
    pub top_track: Option<String>,
    #[serde(default)]
    pub top_artist: Option<String>,
    #[serde(default)]
    pub top_genre: Option<String>,
}

impl From<QuickStatsEnvelope> for QuickStats {
    fn from(envelope: QuickStatsEnvelope) -> Self {
        let Some(first) = envelope.quick_stats.into_iter().next() else {
            return QuickStats::default();
        };

        let or_na = |field: Option<String>| {
            field
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        QuickStats {
            top_track: or_na(first.top_track),
            top_artist: or_na(first.top_artist),
            top_genre: or_na(first.top_genre),
        }
    }
}
