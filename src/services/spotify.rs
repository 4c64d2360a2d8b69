// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spotify accounts client.
//!
//! Handles:
//! - Building the authorization redirect
//! - Authorization-code exchange at sign-in
//! - Refresh-token exchange when the access token expires

use crate::config::{Config, SPOTIFY_SCOPES};
use crate::error::AppError;
use crate::models::{TokenError, TokenGrant, TokenRecord};
use chrono::Utc;
use serde::Deserialize;

/// Spotify accounts client (authorize + token endpoints).
#[derive(Clone)]
pub struct SpotifyClient {
    http: reqwest::Client,
    authorize_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl SpotifyClient {
    /// Create a new client with OAuth credentials.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            authorize_url: config.spotify_authorize_url.clone(),
            token_url: config.spotify_token_url.clone(),
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
        }
    }

    /// URL the browser is sent to for consent.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(SPOTIFY_SCOPES),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for the initial grant.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Token exchange failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Refresh an expired record.
    ///
    /// Never fails: a rejected or unreachable exchange yields the input record
    /// flagged with [`TokenError::RefreshFailed`]. Errored records are terminal
    /// and come back unchanged without contacting Spotify.
    pub async fn refresh(&self, record: &TokenRecord) -> TokenRecord {
        if record.is_errored() {
            return record.clone();
        }

        if record.refresh_token().is_empty() {
            tracing::warn!("Session has no refresh token, marking refresh as failed");
            return record.with_error(TokenError::RefreshFailed);
        }

        match self.request_refresh(record.refresh_token()).await {
            Ok(grant) => {
                let rotated = grant.refresh_token.is_some();
                let expires_in = grant.expires_in;
                match record.refreshed(grant, Utc::now()) {
                    Some(refreshed) => {
                        tracing::info!(
                            rotated,
                            expires_at = %refreshed.expires_at(),
                            "Access token refreshed"
                        );
                        refreshed
                    }
                    None => {
                        tracing::error!(expires_in, "Refresh grant expiry out of range");
                        record.with_error(TokenError::RefreshFailed)
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error refreshing access token");
                record.with_error(TokenError::RefreshFailed)
            }
        }
    }

    /// One `grant_type=refresh_token` exchange, authenticated with HTTP Basic.
    async fn request_refresh(&self, refresh_token: &str) -> Result<TokenGrant, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Spotify rate limit hit (429)");
            }

            return Err(AppError::Provider(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))
    }
}
