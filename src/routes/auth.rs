// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::middleware::session::{removal_cookie, session_cookie};
use crate::models::TokenRecord;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// How long a signed OAuth state stays acceptable (10 minutes).
const STATE_MAX_AGE_MS: i64 = 10 * 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/spotify", get(auth_start))
        .route("/auth/spotify/callback", get(auth_callback))
        .route("/auth/logout", get(logout_redirect).post(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after OAuth completes.
    /// If not provided, uses FRONTEND_URL env var.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start OAuth flow - redirect to Spotify authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(
        &frontend_url,
        Utc::now().timestamp_millis(),
        &state.config.session_secret,
    )?;

    let callback_url = callback_url(&headers);
    let auth_url = state
        .session_service
        .spotify()
        .authorization_url(&callback_url, &oauth_state);

    tracing::info!(
        client_id = %state.config.spotify_client_id,
        frontend_url = %frontend_url,
        "Starting OAuth flow, redirecting to Spotify"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for tokens, start the session.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_state(s, &state.config.session_secret, Utc::now().timestamp_millis()))
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    // Check for OAuth errors (e.g. the user denied consent)
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Spotify");
        let redirect = format!("{}/login?error={}", frontend_url, urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    tracing::info!("Exchanging authorization code for tokens");

    let grant = state
        .session_service
        .spotify()
        .exchange_code(&code, &callback_url(&headers))
        .await?;

    if grant.refresh_token.is_none() {
        tracing::warn!("Spotify grant carried no refresh token; session cannot be refreshed");
    }

    let record = TokenRecord::issue(grant, Utc::now());
    let value = state.session_service.encode(&record)?;

    tracing::info!(expires_at = %record.expires_at(), "OAuth successful, session created");

    let jar = jar.add(session_cookie(value, state.config.secure_cookies()));
    let redirect_url = format!("{}/dashboard", frontend_url);

    Ok((jar, Redirect::temporary(&redirect_url)))
}

/// Logout - clear the session cookie.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.add(removal_cookie(state.config.secure_cookies())),
        StatusCode::NO_CONTENT,
    )
}

/// Logout via link - clear the session cookie and go back to the frontend.
async fn logout_redirect(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    (
        jar.add(removal_cookie(state.config.secure_cookies())),
        Redirect::temporary(&state.config.frontend_url),
    )
}

/// Callback URL registered with Spotify, derived from the request host.
fn callback_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:8080");

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/spotify/callback", scheme, host)
}

/// Sign "frontend_url|timestamp_hex" and encode it for the `state` parameter.
fn sign_state(frontend_url: &str, now_ms: i64, secret: &[u8]) -> Result<String> {
    let payload = format!("{}|{:x}", frontend_url, now_ms);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Verify the signature and age of an OAuth state and return its frontend URL.
fn verify_state(state: &str, secret: &[u8], now_ms: i64) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    // Format is "frontend_url|timestamp_hex|signature_hex"; the URL itself
    // may contain '|', so split from the right.
    let mut parts = state_str.rsplitn(3, '|');
    let signature_hex = parts.next()?;
    let timestamp_hex = parts.next()?;
    let frontend_url = parts.next()?;

    let payload = format!("{}|{}", frontend_url, timestamp_hex);
    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if !bool::from(expected.as_bytes().ct_eq(signature_hex.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued_ms = i64::from_str_radix(timestamp_hex, 16).ok()?;
    if now_ms - issued_ms > STATE_MAX_AGE_MS {
        tracing::warn!("OAuth state expired");
        return None;
    }

    Some(frontend_url.to_string())
}
