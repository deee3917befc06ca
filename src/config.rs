//! Configuration management for the Spotify Timer API.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. All runtime parameters, from the
//! Spotify application credentials to the bind address of the HTTP server,
//! are gathered into a single [`AppConfig`] value at startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (or the working directory)
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use dotenv;
use reqwest::Url;
use thiserror::Error;

use crate::Res;

/// Scope requested during authorization when `SPOTIFY_SCOPE` is not set.
///
/// Playback relay needs read and modify access to the player, and the
/// frontend shows the account's profile, so the default asks for all of it
/// up front.
pub const DEFAULT_SCOPE: &str =
    "user-read-playback-state user-modify-playback-state user-read-private streaming user-read-email";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `spotitimer/.env`. When that file does not
/// exist, a `.env` in the working directory is tried instead; deployments
/// that configure the process environment directly need neither.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/spotitimer/.env`
/// - macOS: `~/Library/Application Support/spotitimer/.env`
/// - Windows: `%LOCALAPPDATA%/spotitimer/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - An existing `.env` file cannot be read or parsed
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotitimer/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    } else {
        // Absence is fine; the process environment may already be populated.
        let _ = dotenv::dotenv();
    }
    Ok(())
}

/// Errors raised while assembling an [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} must be set")]
    MissingVar(&'static str),

    #[error("invalid URL in {name}: {message}")]
    InvalidUrl { name: &'static str, message: String },

    #[error("invalid number in {name}: {message}")]
    InvalidNumber { name: &'static str, message: String },
}

/// Runtime configuration shared by every component of the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Client ID of the registered Spotify application.
    pub client_id: String,
    /// Client secret of the registered Spotify application.
    pub client_secret: String,
    /// Redirect URI registered with Spotify; the callback route must be
    /// reachable under this exact URL.
    pub redirect_uri: String,
    /// Space-separated OAuth scope string requested at authorization.
    pub scope: String,
    /// Frontend origin that receives the post-login redirect.
    pub frontend_url: Url,
    /// Spotify's OAuth authorization endpoint.
    pub authorize_url: Url,
    /// Spotify's OAuth token endpoint.
    pub token_url: Url,
    /// Base URL of the Spotify Web API, without a trailing slash.
    pub api_base_url: String,
    /// Address and port the HTTP server binds to.
    pub server_address: String,
    /// Directory holding timer settings and track positions.
    pub data_dir: PathBuf,
    /// Per-request deadline for all upstream calls.
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Assembles the configuration from the process environment.
    ///
    /// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and `REDIRECT_URI` are
    /// required; everything else falls back to a sensible default. Endpoint
    /// URLs are validated here so a typo fails at startup instead of on the
    /// first request.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is missing or a URL
    /// or number does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let client_id = required("SPOTIFY_CLIENT_ID")?;
        let client_secret = required("SPOTIFY_CLIENT_SECRET")?;
        let redirect_uri = required("REDIRECT_URI")?;
        let scope = var_or("SPOTIFY_SCOPE", DEFAULT_SCOPE);

        let frontend_url = parse_url(
            "FRONTEND_URL",
            var_or("FRONTEND_URL", "https://spotify-timer.vercel.app"),
        )?;
        let authorize_url = parse_url(
            "SPOTIFY_AUTH_URL",
            var_or("SPOTIFY_AUTH_URL", "https://accounts.spotify.com/authorize"),
        )?;
        let token_url = parse_url(
            "SPOTIFY_TOKEN_URL",
            var_or("SPOTIFY_TOKEN_URL", "https://accounts.spotify.com/api/token"),
        )?;
        let api_base_url = base_url("SPOTIFY_API_URL", "https://api.spotify.com/v1")?;

        let server_address = var_or("SERVER_ADDRESS", "0.0.0.0:8000");

        let data_dir = match env::var("DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("spotitimer"),
        };

        let timeout_secs = var_or("REQUEST_TIMEOUT_SECS", "10");
        let timeout_secs: u64 =
            timeout_secs
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidNumber {
                    name: "REQUEST_TIMEOUT_SECS",
                    message: e.to_string(),
                })?;

        Ok(AppConfig {
            client_id,
            client_secret,
            redirect_uri,
            scope,
            frontend_url,
            authorize_url,
            token_url,
            api_base_url,
            server_address,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Reads a required variable, treating an empty value as unset.
fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Reads a variable with a fallback, treating an empty value as unset.
fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_url(name: &'static str, raw: String) -> Result<Url, ConfigError> {
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        message: e.to_string(),
    })
}

/// Validates a base URL and normalizes away the trailing slash so paths can
/// be appended verbatim.
fn base_url(name: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = var_or(name, default);
    parse_url(name, raw.clone())?;
    Ok(raw.trim_end_matches('/').to_string())
}
