// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token record and its lifecycle states.
//!
//! A [`TokenRecord`] is created from the provider's grant at sign-in and is
//! only ever replaced by a refresh. Expiry is always derived from the
//! provider's `expires_in`, never supplied by callers.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

/// Token response from the provider's token endpoint.
///
/// `refresh_token` is optional because refresh responses may omit it when
/// the provider does not rotate.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Why a record can no longer be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
pub enum TokenError {
    /// The refresh exchange was rejected or could not be completed.
    #[serde(rename = "RefreshAccessTokenError")]
    RefreshFailed,
}

/// Lifecycle state of a session's tokens at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Unauthenticated,
    Active,
    Expired,
    Errored,
}

impl TokenState {
    /// State of an optional record; no record means the user never signed in.
    pub fn of(record: Option<&TokenRecord>, now: DateTime<Utc>) -> Self {
        match record {
            None => TokenState::Unauthenticated,
            Some(record) => record.state(now),
        }
    }
}

/// Authentication state for one user session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    access_token: String,
    refresh_token: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<TokenError>,
}

impl TokenRecord {
    /// Create a record from the initial authorization-code grant.
    pub fn issue(grant: TokenGrant, now: DateTime<Utc>) -> Self {
        Self {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.unwrap_or_default(),
            expires_at: saturating_expiry(now, grant.expires_in),
            error: None,
        }
    }

    /// Pure validity predicate: `now < expires_at`.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn state(&self, now: DateTime<Utc>) -> TokenState {
        if self.error.is_some() {
            TokenState::Errored
        } else if self.is_valid(now) {
            TokenState::Active
        } else {
            TokenState::Expired
        }
    }

    /// Access token, only while the record may be used for authenticated calls.
    pub fn usable_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match self.state(now) {
            TokenState::Active => Some(&self.access_token),
            _ => None,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn error(&self) -> Option<TokenError> {
        self.error
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    /// Apply a successful refresh exchange.
    ///
    /// The refresh token is replaced only when the provider rotated it.
    /// `None` when `expires_in` does not fit in a timestamp.
    pub fn refreshed(&self, grant: TokenGrant, now: DateTime<Utc>) -> Option<Self> {
        Some(Self {
            expires_at: expiry(now, grant.expires_in)?,
            access_token: grant.access_token,
            refresh_token: grant
                .refresh_token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| self.refresh_token.clone()),
            error: None,
        })
    }

    /// Copy of this record flagged with `error`; other fields untouched.
    pub fn with_error(&self, error: TokenError) -> Self {
        Self {
            error: Some(error),
            ..self.clone()
        }
    }
}

/// Expiry truncated to the millisecond precision the session cookie stores.
fn expiry(now: DateTime<Utc>, expires_in: i64) -> Option<DateTime<Utc>> {
    let at = now.checked_add_signed(Duration::try_seconds(expires_in)?)?;
    Some(at.duration_trunc(Duration::milliseconds(1)).unwrap_or(at))
}

/// Like [`expiry`], but clamps out-of-range lifetimes to the timestamp range.
fn saturating_expiry(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    expiry(now, expires_in).unwrap_or(if expires_in < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
