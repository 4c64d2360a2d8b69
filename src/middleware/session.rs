// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie middleware.

use crate::error::AppError;
use crate::models::TokenRecord;
use crate::services::session::SESSION_TTL_SECS;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use std::sync::Arc;

/// Name of the cookie holding the signed token record.
pub const SESSION_COOKIE: &str = "track_record_session";

/// Current session, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct Session {
    pub token: TokenRecord,
}

impl Session {
    /// Access token for an authenticated call, or `SessionExpired` when the
    /// refresh failed and the user has to sign in again.
    pub fn access_token(&self) -> Result<&str, AppError> {
        self.token
            .usable_access_token(Utc::now())
            .ok_or(AppError::SessionExpired)
    }
}

/// Middleware that requires a session cookie and keeps its token fresh.
///
/// An expired access token is refreshed before the handler runs; the new
/// record (or the errored one, if the refresh failed) is written back to the
/// cookie on the way out.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Try cookie first, then header
    let value = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        cookie.value().to_string()
    } else {
        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
            Some(token) => token.to_string(),
            None => return Err(AppError::Unauthorized),
        }
    };

    let token = state.session_service.decode(&value)?;
    let resolved = state.session_service.resolve(token).await;

    let cookie = if resolved.changed {
        let value = state.session_service.encode(&resolved.record)?;
        Some(session_cookie(value, state.config.secure_cookies()))
    } else {
        None
    };

    request.extensions_mut().insert(Session {
        token: resolved.record,
    });

    let response = next.run(request).await;

    Ok(match cookie {
        Some(cookie) => (jar.add(cookie), response).into_response(),
        None => response,
    })
}

/// Build the session cookie carrying a signed record.
pub fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64))
        .build()
}

/// Removal cookie matching the attributes of [`session_cookie`].
pub fn removal_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie
}
