// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use chrono::Utc;
use std::sync::{Arc, Mutex};
use track_record::config::Config;
use track_record::middleware::session::SESSION_COOKIE;
use track_record::models::{TokenGrant, TokenRecord};
use track_record::routes::create_router;
use track_record::AppState;

/// A request seen by a [`MockServer`].
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[allow(dead_code)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

/// Local HTTP server answering every request with one canned response.
#[derive(Clone)]
#[allow(dead_code)]
pub struct MockServer {
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockServer {
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn last_request(&self) -> CapturedRequest {
        self.requests()
            .pop()
            .expect("mock server should have received a request")
    }
}

/// Spawn a mock server that replies `status` with `reply_body` to anything.
#[allow(dead_code)]
pub async fn mock_server(status: StatusCode, reply_body: serde_json::Value) -> MockServer {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let captured = requests.clone();

    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let captured = captured.clone();
            let reply_body = reply_body.clone();
            async move {
                captured.lock().unwrap().push(CapturedRequest {
                    method,
                    path: uri.path().to_string(),
                    headers,
                    body: String::from_utf8_lossy(&body).to_string(),
                });
                reply(status, reply_body)
            }
        },
    );

    let url = serve(app).await;
    MockServer { url, requests }
}

/// Bind an ephemeral port and serve `app` in the background.
#[allow(dead_code)]
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Test config pointing the provider and backend at the given URLs.
#[allow(dead_code)]
pub fn test_config(provider_url: &str, backend_url: &str) -> Config {
    Config {
        spotify_token_url: format!("{}/api/token", provider_url),
        backend_url: backend_url.to_string(),
        ..Config::test_default()
    }
}

/// Create a test app from `config`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config));
    (create_router(state.clone()), state)
}

/// Token record issued `expires_in` seconds from now.
#[allow(dead_code)]
pub fn issued(access: &str, refresh: &str, expires_in: i64) -> TokenRecord {
    TokenRecord::issue(
        TokenGrant {
            access_token: access.to_string(),
            expires_in,
            refresh_token: Some(refresh.to_string()),
        },
        Utc::now(),
    )
}

/// `Cookie` header value carrying `record` as the session.
#[allow(dead_code)]
pub fn session_cookie(state: &AppState, record: &TokenRecord) -> String {
    let value = state
        .session_service
        .encode(record)
        .expect("Failed to encode session");
    format!("{}={}", SESSION_COOKIE, value)
}

/// Canned JSON reply.
#[allow(dead_code)]
pub fn reply(status: StatusCode, body: serde_json::Value) -> axum::response::Response {
    (status, Json(body)).into_response()
}
