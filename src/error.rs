use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failure modes of the API, each mapped to a fixed HTTP status.
///
/// Every variant renders as `{"detail": "..."}` so the frontend can surface
/// one message field no matter what went wrong.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed before any Spotify call was made.
    #[error("{0}")]
    Validation(String),

    /// The authorization code could not be exchanged for tokens.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The refresh token was rejected or the renewal call failed.
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// Spotify rejected the bearer token on a relay call.
    #[error("Spotify rejected the access token: {0}")]
    Unauthorized(String),

    /// Playback was requested but the account has no device to play on.
    #[error("No active Spotify device available")]
    NoActiveDevice,

    /// Any other upstream failure, with the upstream status when one arrived.
    #[error("Spotify request failed: {detail}")]
    Upstream { status: Option<u16>, detail: String },

    /// The settings store could not be read or written.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl ServiceError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn upstream(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            detail: detail.into(),
        }
    }

    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AuthenticationFailed(_) => StatusCode::BAD_REQUEST,
            Self::RefreshFailed(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NoActiveDevice => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Body rejections surface in the same shape as our own validation errors,
// matching what the frontend already expects from parameter checks.
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(detail = %self, "request failed");
        } else {
            tracing::debug!(detail = %self, "request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
