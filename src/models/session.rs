// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only session view handed to the frontend.

use super::token::{TokenError, TokenRecord};
use serde::Serialize;

/// What the frontend sees of the current session.
///
/// `error` is always present (`null` when healthy) so the frontend can key
/// its sign-in prompt off a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionView {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry as Unix epoch milliseconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub expires_at: i64,
    pub error: Option<TokenError>,
}

impl From<&TokenRecord> for SessionView {
    fn from(record: &TokenRecord) -> Self {
        Self {
            access_token: record.access_token().to_string(),
            refresh_token: record.refresh_token().to_string(),
            expires_at: record.expires_at().timestamp_millis(),
            error: record.error(),
        }
    }
}
