use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use crate::{
    api::require,
    error::ServiceError,
    server::AppState,
    spotify,
    types::{DevicesResponse, PlayRequest, PlaybackState, TransferRequest, UserProfile},
};

pub async fn user_profile(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<UserProfile>, ServiceError> {
    let token = require(&params, "access_token")?;
    let profile = spotify::user::current_user(&state.api.with_token(token)).await?;
    Ok(Json(profile))
}

pub async fn search_tracks(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError> {
    let token = require(&params, "access_token")?;
    let query = require(&params, "q")?;
    let tracks = spotify::search::search_tracks(&state.api.with_token(token), query).await?;
    Ok(Json(json!({ "tracks": tracks })))
}

pub async fn search_playlists(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError> {
    let token = require(&params, "access_token")?;
    let query = require(&params, "q")?;
    let playlists = spotify::search::search_playlists(&state.api.with_token(token), query).await?;
    Ok(Json(json!({ "playlists": playlists })))
}

pub async fn devices(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<DevicesResponse>, ServiceError> {
    let token = require(&params, "access_token")?;
    let devices = spotify::player::devices(&state.api.with_token(token)).await?;
    Ok(Json(devices))
}

pub async fn playback_state(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<PlaybackState>, ServiceError> {
    let token = require(&params, "access_token")?;
    let playback = spotify::player::playback_state(&state.api.with_token(token)).await?;
    Ok(Json(playback))
}

pub async fn transfer_playback(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    WithRejection(Json(request), _): WithRejection<Json<TransferRequest>, ServiceError>,
) -> Result<Json<Value>, ServiceError> {
    let token = require(&params, "access_token")?;
    // Spotify accepts a single target; additional ids are ignored, not
    // rejected, so callers sending the full list keep working.
    let device_id = request
        .device_ids
        .first()
        .ok_or_else(|| ServiceError::validation("device_ids must contain at least one device id"))?;

    spotify::player::transfer_playback(&state.api.with_token(token), device_id, request.play)
        .await?;

    Ok(Json(json!({
        "status": "transferred",
        "device_id": device_id,
    })))
}

pub async fn play(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    WithRejection(Json(request), _): WithRejection<Json<PlayRequest>, ServiceError>,
) -> Result<Json<Value>, ServiceError> {
    let token = require(&params, "access_token")?;
    if request.track_uri.trim().is_empty() {
        return Err(ServiceError::validation("track_uri must not be empty"));
    }

    let device_id = spotify::player::start_playback(
        &state.api.with_token(token),
        &request.track_uri,
        request.position_ms,
        request.device_id,
    )
    .await?;

    Ok(Json(json!({
        "status": "playing",
        "track_uri": request.track_uri,
        "position_ms": request.position_ms,
        "device_id": device_id,
    })))
}

pub async fn pause(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError> {
    let token = require(&params, "access_token")?;
    let device_id = params
        .get("device_id")
        .map(String::as_str)
        .filter(|id| !id.trim().is_empty());

    spotify::player::pause_playback(&state.api.with_token(token), device_id).await?;

    Ok(Json(json!({ "status": "paused" })))
}
