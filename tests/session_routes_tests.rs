// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end tests for the session middleware and the routes behind it.
//!
//! The Spotify token endpoint and the analytics backend are both local mock
//! servers, so these tests run without network access.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use track_record::models::TokenError;

mod common;
use common::{create_test_app, issued, mock_server, session_cookie, test_config};

const OFFLINE: &str = "http://127.0.0.1:9";

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn call(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Value of the session cookie set by `response`, if any.
fn set_session_value(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix("track_record_session="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = create_test_app(test_config(OFFLINE, OFFLINE));

    let response = call(&app, get("/health", None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_session_routes_require_cookie() {
    let (app, _) = create_test_app(test_config(OFFLINE, OFFLINE));

    for uri in ["/api/session", "/api/dashboard/top-tracks", "/api/dashboard/moods"] {
        let response = call(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body_json(response).await, json!({"error": "unauthorized"}));
    }
}

#[tokio::test]
async fn test_tampered_cookie_is_rejected() {
    let (app, _) = create_test_app(test_config(OFFLINE, OFFLINE));

    let response = call(
        &app,
        get("/api/session", Some("track_record_session=not.a.jwt")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_view_for_active_session() {
    let (app, state) = create_test_app(test_config(OFFLINE, OFFLINE));
    let record = issued("access-1", "refresh-1", 3600);
    let cookie = session_cookie(&state, &record);

    let response = call(&app, get("/api/session", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_session_value(&response).is_none());
    assert_eq!(
        body_json(response).await,
        json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "expiresAt": record.expires_at().timestamp_millis(),
            "error": null,
        })
    );
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let (app, state) = create_test_app(test_config(OFFLINE, OFFLINE));
    let value = state
        .session_service
        .encode(&issued("access-1", "refresh-1", 3600))
        .unwrap();

    let request = Request::builder()
        .uri("/api/session")
        .header(header::AUTHORIZATION, format!("Bearer {}", value))
        .body(Body::empty())
        .unwrap();
    let response = call(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_expired_session_is_refreshed_and_rewritten() {
    let provider = mock_server(
        StatusCode::OK,
        json!({"access_token": "access-2", "expires_in": 3600}),
    )
    .await;
    let (app, state) = create_test_app(test_config(&provider.url, OFFLINE));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", -60));

    let response = call(&app, get("/api/session", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let rewritten = set_session_value(&response).expect("refreshed session should be written back");
    let stored = state.session_service.decode(&rewritten).unwrap();
    assert_eq!(stored.access_token(), "access-2");
    assert_eq!(stored.refresh_token(), "refresh-1");

    let body = body_json(response).await;
    assert_eq!(body["accessToken"], "access-2");
    assert_eq!(body["error"], Value::Null);
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn test_failed_refresh_surfaces_error_in_session_view() {
    let provider = mock_server(StatusCode::BAD_REQUEST, json!({"error": "invalid_grant"})).await;
    let (app, state) = create_test_app(test_config(&provider.url, OFFLINE));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", -60));

    let response = call(&app, get("/api/session", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let rewritten = set_session_value(&response).expect("errored session should be written back");
    assert_eq!(
        state.session_service.decode(&rewritten).unwrap().error(),
        Some(TokenError::RefreshFailed)
    );

    let body = body_json(response).await;
    assert_eq!(body["accessToken"], "access-1");
    assert_eq!(body["refreshToken"], "refresh-1");
    assert_eq!(body["error"], "RefreshAccessTokenError");
}

#[tokio::test]
async fn test_errored_session_is_refused_on_dashboard() {
    let backend = mock_server(StatusCode::OK, json!({"top_tracks": []})).await;
    let (app, state) = create_test_app(test_config(OFFLINE, &backend.url));
    let errored = issued("access-1", "refresh-1", 3600).with_error(TokenError::RefreshFailed);
    let cookie = session_cookie(&state, &errored);

    let response = call(&app, get("/api/dashboard/top-tracks", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({"error": "refresh_failed"}));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_dashboard_relays_backend_result() {
    let backend = mock_server(StatusCode::OK, json!({"top_tracks": ["CHANEL"]})).await;
    let (app, state) = create_test_app(test_config(OFFLINE, &backend.url));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", 3600));

    let response = call(&app, get("/api/dashboard/top-tracks", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"data": {"top_tracks": ["CHANEL"]}})
    );
    assert_eq!(
        backend.last_request().header("authorization"),
        Some("Bearer access-1")
    );
}

#[tokio::test]
async fn test_dashboard_backend_failure_is_in_body() {
    let backend = mock_server(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let (app, state) = create_test_app(test_config(OFFLINE, &backend.url));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", 3600));

    let response = call(&app, get("/api/dashboard/recently-played", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Recently played failed: 500"})
    );

    let response = call(&app, get("/api/dashboard/quick-stats", Some(&cookie))).await;
    assert_eq!(
        body_json(response).await,
        json!({"topTrack": "N/A", "topArtist": "N/A", "topGenre": "N/A"})
    );

    let response = call(&app, get("/api/dashboard/discover-weekly", Some(&cookie))).await;
    assert_eq!(body_json(response).await, Value::Null);
}

#[tokio::test]
async fn test_moods_from_backend_genres() {
    let backend = mock_server(StatusCode::OK, json!({"top_genres": ["dance pop", "hip hop"]})).await;
    let (app, state) = create_test_app(test_config(OFFLINE, &backend.url));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", 3600));

    let response = call(&app, get("/api/dashboard/moods", Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"moods": ["Upbeat & Fun", "High Energy", "Bold & Confident"]})
    );
    assert_eq!(backend.last_request().path, "/api/top-genres");
}

#[tokio::test]
async fn test_moods_when_genres_unavailable() {
    let backend = mock_server(StatusCode::INTERNAL_SERVER_ERROR, json!({})).await;
    let (app, state) = create_test_app(test_config(OFFLINE, &backend.url));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", 3600));

    let response = call(&app, get("/api/dashboard/moods", Some(&cookie))).await;

    assert_eq!(body_json(response).await, json!({"moods": ["Unknown Mood"]}));
}

#[tokio::test]
async fn test_audio_features_validates_track_ids() {
    let backend = mock_server(StatusCode::OK, json!({"audio_features": []})).await;
    let (app, state) = create_test_app(test_config(OFFLINE, &backend.url));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", 3600));

    let post = |body: Value| {
        Request::builder()
            .method("POST")
            .uri("/api/dashboard/audio-features")
            .header(header::COOKIE, cookie.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = call(&app, post(json!({"track_ids": []}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let too_many: Vec<String> = (0..101).map(|i| format!("t{i}")).collect();
    let response = call(&app, post(json!({"track_ids": too_many}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(backend.requests().is_empty());

    let response = call(&app, post(json!({"track_ids": ["t1"]}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"audio_features": []})
    );
}

#[tokio::test]
async fn test_sync_token_posts_access_token() {
    let backend = mock_server(
        StatusCode::OK,
        json!({"success": true, "received": "access-1"}),
    )
    .await;
    let (app, state) = create_test_app(test_config(OFFLINE, &backend.url));
    let cookie = session_cookie(&state, &issued("access-1", "refresh-1", 3600));

    let request = Request::builder()
        .method("POST")
        .uri("/api/dashboard/token")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = call(&app, request).await;

    assert_eq!(
        body_json(response).await,
        json!({"data": {"success": true, "received": "access-1"}})
    );
    assert_eq!(backend.last_request().json(), json!({"accessToken": "access-1"}));
}
