//! # API Module
//!
//! This module provides the HTTP endpoints of the Spotify Timer backend. It
//! implements the OAuth entry points, the playback relay routes the frontend
//! calls during a timer session, and the persistence routes for settings and
//! track positions.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Hands the frontend the Spotify authorization URL
//! - [`callback`] - Receives the authorization code, exchanges it, and
//!   redirects back to the frontend with the tokens in the fragment-free
//!   query string
//! - [`refresh`] - Renews an access token from a refresh token
//!
//! ### Playback Relay
//!
//! - [`user_profile`] - Profile of the token's owner
//! - [`search_tracks`] / [`search_playlists`] - Catalog search
//! - [`devices`] - Available playback devices
//! - [`playback_state`] - Current playback state, idle when nothing plays
//! - [`transfer_playback`] - Moves playback to a chosen device
//! - [`play`] / [`pause`] - Starts a track at a position, pauses playback
//!
//! ### Timer Persistence
//!
//! - [`save_settings`] / [`get_settings`] - Per-user timer configuration
//! - [`save_position`] / [`get_position`] - Per-track resume positions
//!
//! ### Monitoring
//!
//! - [`root`] - Identifies the service
//! - [`health`] - Health check with version information for monitors
//!
//! ## Validation
//!
//! Handlers validate their own query parameters against a plain map instead
//! of letting the framework reject requests, so a missing parameter and a
//! missing body field produce the same `422` with a `{"detail"}` body. No
//! upstream call is made before validation passes.

use std::collections::HashMap;

use crate::error::ServiceError;

mod auth;
mod health;
mod player;
mod timer;

pub use auth::{callback, login, refresh};
pub use health::{health, root};
pub use player::{
    devices, pause, play, playback_state, search_playlists, search_tracks, transfer_playback,
    user_profile,
};
pub use timer::{get_position, get_settings, save_position, save_settings};

/// Fetches a required query parameter, treating empty values as missing.
pub(crate) fn require<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, ServiceError> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ServiceError::validation(format!("{name} query parameter is required")))
}
