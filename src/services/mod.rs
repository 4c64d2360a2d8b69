// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod backend;
pub mod mood;
pub mod session;
pub mod spotify;

pub use backend::BackendClient;
pub use mood::top_moods_from_genres;
pub use session::SessionService;
pub use spotify::SpotifyClient;
