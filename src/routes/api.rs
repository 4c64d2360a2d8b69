// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session propagation to the frontend.

use crate::middleware::Session;
use crate::models::SessionView;
use crate::AppState;
use axum::{routing::get, Extension, Json, Router};
use std::sync::Arc;

/// Session routes (require a session cookie).
/// The session middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/session", get(get_session))
}

/// Current session, already refreshed if it had expired.
///
/// A failed refresh is reported through `error` rather than a 401 so the
/// frontend can show its sign-in prompt.
async fn get_session(Extension(session): Extension<Session>) -> Json<SessionView> {
    Json(SessionView::from(&session.token))
}
