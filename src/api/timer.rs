use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    server::AppState,
    types::{TimerSettings, TimerSettingsCreate, TrackPosition, TrackPositionUpdate},
};

const DEFAULT_TIMER_MINUTES: f64 = 30.0;
const DEFAULT_PLAY_SECONDS: u32 = 30;

pub async fn save_settings(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<TimerSettingsCreate>, ServiceError>,
) -> Result<Json<TimerSettings>, ServiceError> {
    if request.user_id.trim().is_empty() {
        return Err(ServiceError::validation("user_id must not be empty"));
    }

    let settings = TimerSettings {
        id: Uuid::new_v4().to_string(),
        user_id: request.user_id,
        timer_duration_minutes: request.timer_duration_minutes,
        play_duration_seconds: request.play_duration_seconds,
        selected_tracks: request.selected_tracks,
        created_at: Utc::now(),
    };
    state.settings.save(&settings).await?;

    Ok(Json(settings))
}

pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<TimerSettings>, ServiceError> {
    let settings = match state.settings.load(&user_id).await? {
        Some(settings) => settings,
        // Unknown users get defaults instead of a 404 so the frontend can
        // render the settings screen unconditionally.
        None => TimerSettings {
            id: Uuid::new_v4().to_string(),
            user_id,
            timer_duration_minutes: DEFAULT_TIMER_MINUTES,
            play_duration_seconds: DEFAULT_PLAY_SECONDS,
            selected_tracks: Vec::new(),
            created_at: Utc::now(),
        },
    };

    Ok(Json(settings))
}

pub async fn save_position(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<TrackPositionUpdate>, ServiceError>,
) -> Result<Json<Value>, ServiceError> {
    if request.user_id.trim().is_empty() {
        return Err(ServiceError::validation("user_id must not be empty"));
    }
    if request.track_uri.trim().is_empty() {
        return Err(ServiceError::validation("track_uri must not be empty"));
    }

    let position = TrackPosition {
        id: Uuid::new_v4().to_string(),
        user_id: request.user_id,
        track_uri: request.track_uri,
        current_position_ms: request.current_position_ms,
        last_played_at: Utc::now(),
    };
    state.positions.save(&position).await?;

    Ok(Json(json!({
        "status": "saved",
        "position_ms": position.current_position_ms,
    })))
}

pub async fn get_position(
    State(state): State<AppState>,
    Path((user_id, track_uri)): Path<(String, String)>,
) -> Result<Json<TrackPosition>, ServiceError> {
    let position = match state.positions.load(&user_id, &track_uri).await? {
        Some(position) => position,
        // A track that was never interrupted starts from the beginning.
        None => TrackPosition {
            id: Uuid::new_v4().to_string(),
            user_id,
            track_uri,
            current_position_ms: 0,
            last_played_at: Utc::now(),
        },
    };

    Ok(Json(position))
}
