// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod backend;
pub mod session;
pub mod token;

pub use backend::{BackendResult, QuickStats};
pub use session::SessionView;
pub use token::{TokenError, TokenGrant, TokenRecord, TokenState};
