// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token lifecycle: cookie encoding and refresh-on-demand.
//!
//! The [`TokenRecord`] lives in a signed session cookie. On each request the
//! middleware decodes it and calls [`SessionService::resolve`], which does
//! one validity check and, if the access token has expired, one refresh.

use crate::error::AppError;
use crate::models::TokenRecord;
use crate::services::SpotifyClient;
use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session cookie lifetime (30 days). The refresh token outlives the
/// access token, so the cookie is kept long after the first expiry.
pub const SESSION_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Signed cookie claims: registered timestamps plus the token record.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    #[serde(flatten)]
    pub token: TokenRecord,
}

/// Refreshed records keyed by the refresh token they replaced.
pub type RefreshCache = Arc<DashMap<String, TokenRecord>>;

/// Per-refresh-token mutex so one stale record is refreshed at most once.
pub type RefreshLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Outcome of resolving a session for one request.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub record: TokenRecord,
    /// The record differs from the one in the request cookie and must be
    /// written back.
    pub changed: bool,
}

/// Encodes, decodes and refreshes session token records.
#[derive(Clone)]
pub struct SessionService {
    spotify: SpotifyClient,
    signing_key: Vec<u8>,
    refreshed: RefreshCache,
    refresh_locks: RefreshLocks,
}

impl SessionService {
    pub fn new(spotify: SpotifyClient, signing_key: Vec<u8>) -> Self {
        Self {
            spotify,
            signing_key,
            refreshed: Arc::new(DashMap::new()),
            refresh_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn spotify(&self) -> &SpotifyClient {
        &self.spotify
    }

    /// Sign a record into a session cookie value.
    pub fn encode(&self, token: &TokenRecord) -> Result<String, AppError> {
        let now = Utc::now().timestamp() as usize;
        let claims = SessionClaims {
            exp: now + SESSION_TTL_SECS as usize,
            iat: now,
            token: token.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_key),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session encoding failed: {}", e)))
    }

    /// Verify and decode a session cookie value.
    pub fn decode(&self, value: &str) -> Result<TokenRecord, AppError> {
        let key = DecodingKey::from_secret(&self.signing_key);
        let validation = Validation::new(Algorithm::HS256);

        decode::<SessionClaims>(value, &key, &validation)
            .map(|data| data.claims.token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session cookie");
                AppError::Unauthorized
            })
    }

    /// Return a usable record for this request, refreshing if expired.
    ///
    /// Errored records are returned as-is; they stay errored until the user
    /// signs in again.
    pub async fn resolve(&self, record: TokenRecord) -> Resolved {
        if record.is_errored() || record.is_valid(Utc::now()) {
            return Resolved {
                record,
                changed: false,
            };
        }

        let refreshed = self.refresh_once(&record).await;
        let changed = refreshed != record;
        Resolved {
            record: refreshed,
            changed,
        }
    }

    /// Single-flight refresh keyed by the stale refresh token.
    ///
    /// Requests racing on the same expired cookie share one exchange, so a
    /// rotated refresh token is never presented twice.
    async fn refresh_once(&self, record: &TokenRecord) -> TokenRecord {
        let key = record.refresh_token().to_string();

        if let Some(hit) = self.cached(&key) {
            return hit;
        }

        let entry = LockEntry {
            lock: self
                .refresh_locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
            locks: &self.refresh_locks,
            key: &key,
        };

        let _guard = entry.lock.lock().await;

        // Another task may have refreshed while we were waiting.
        if let Some(hit) = self.cached(&key) {
            return hit;
        }

        tracing::info!("Access token expired, refreshing");
        let refreshed = self.spotify.refresh(record).await;

        if !refreshed.is_errored() {
            let now = Utc::now();
            self.refreshed.retain(|_, r| r.is_valid(now));
            self.refreshed.insert(key.clone(), refreshed.clone());
        }

        refreshed
    }

    fn cached(&self, key: &str) -> Option<TokenRecord> {
        let hit = self.refreshed.get(key)?;
        hit.is_valid(Utc::now()).then(|| hit.clone())
    }
}

/// Drops a refresh lock from the map when the refresh finishes or is
/// cancelled, unless another lock has replaced it.
struct LockEntry<'a> {
    lock: Arc<Mutex<()>>,
    locks: &'a RefreshLocks,
    key: &'a str,
}

impl Drop for LockEntry<'_> {
    fn drop(&mut self) {
        self.locks
            .remove_if(self.key, |_, lock| Arc::ptr_eq(lock, &self.lock));
    }
}
