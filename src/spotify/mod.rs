//! # Spotify Integration Module
//!
//! This module provides the interface to Spotify's OAuth endpoints and Web
//! API, implementing the authorization-code flow and the playback, search and
//! profile calls the Spotify Timer frontend relies on. It is the only layer
//! of the service that talks HTTP upstream; route handlers hand it validated
//! input and translate its results into responses.
//!
//! ## Architecture
//!
//! The module follows a feature-based organization where each submodule
//! handles a specific domain of Spotify functionality:
//!
//! ```text
//! Route Handlers (api)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization code)
//!     ├── Player Operations (devices, state, transfer, play, pause)
//!     ├── Search (tracks, playlists)
//!     └── User Profile
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Accounts Service / Web API
//! ```
//!
//! ## Authentication Strategy
//!
//! [`auth`] implements the confidential-client variant of OAuth 2.0: the
//! token endpoint is called with the client ID and secret in an HTTP Basic
//! `Authorization` header, and the authorization URL always carries
//! `show_dialog=true` so returning users can switch accounts. Tokens are
//! never stored server-side; the frontend holds them and sends the access
//! token with every relay call.
//!
//! ## Relay Calls
//!
//! [`client`] wraps `reqwest` with the pieces every Web API call shares:
//! bearer authentication, the per-request timeout, and the translation of
//! upstream failures into [`crate::error::ServiceError`]. A 401 or 403 from
//! Spotify becomes [`crate::error::ServiceError::Unauthorized`] so the
//! frontend can distinguish "token expired, refresh it" from every other
//! failure. [`player`], [`search`] and [`user`] are narrow functions from
//! validated input to one upstream request each.
//!
//! ## API Coverage
//!
//! ### Authentication
//! - `POST /api/token` - Token exchange and refresh operations
//!
//! ### Player
//! - `GET /me/player` - Current playback state (204 when idle)
//! - `GET /me/player/devices` - Available playback devices
//! - `PUT /me/player` - Transfer playback to a device
//! - `PUT /me/player/play` - Start or resume playback at a position
//! - `PUT /me/player/pause` - Pause playback
//!
//! ### Search and Profile
//! - `GET /search` - Track and playlist search
//! - `GET /me` - Profile of the authenticated user

use reqwest::Response;
use serde_json::Value;

pub mod auth;
pub mod client;
pub mod player;
pub mod search;
pub mod user;

pub use auth::SpotifyAuth;
pub use client::{AuthorizedClient, SpotifyApi};

/// Renders an upstream error response as `HTTP <status>: <message>`.
///
/// Spotify uses two error shapes: the Web API wraps messages in
/// `{"error": {"status", "message"}}` while the accounts service returns
/// `{"error", "error_description"}`. Both are unwrapped here; anything else
/// falls back to the raw body.
pub(crate) async fn upstream_detail(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json["error"]["message"]
                .as_str()
                .map(str::to_owned)
                .or_else(|| json["error_description"].as_str().map(str::to_owned))
                .or_else(|| json["error"].as_str().map(str::to_owned))
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "no response body".to_string()
            } else {
                body
            }
        });

    format!("HTTP {}: {}", status.as_u16(), message)
}
