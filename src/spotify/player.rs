use serde_json::json;

use crate::{
    error::ServiceError,
    spotify::AuthorizedClient,
    types::{DevicesResponse, PlaybackState, PlayerStateResponse},
};

/// Lists the devices currently available to the user's account.
pub async fn devices(client: &AuthorizedClient<'_>) -> Result<DevicesResponse, ServiceError> {
    client.get_json("/me/player/devices", &[]).await
}

/// Fetches the current playback state.
///
/// Spotify answers 204 when no device is online and nothing plays; that
/// state is reported as a regular "idle" body instead of an error so the
/// frontend can poll this without special-casing.
pub async fn playback_state(client: &AuthorizedClient<'_>) -> Result<PlaybackState, ServiceError> {
    let upstream: Option<PlayerStateResponse> = client.get_optional_json("/me/player").await?;

    Ok(match upstream {
        Some(state) => PlaybackState {
            is_playing: state.is_playing,
            progress_ms: state.progress_ms,
            device: state.device,
            track: state.item,
        },
        None => PlaybackState {
            is_playing: false,
            progress_ms: None,
            device: None,
            track: None,
        },
    })
}

/// Transfers playback to the given device, optionally starting playback there.
pub async fn transfer_playback(
    client: &AuthorizedClient<'_>,
    device_id: &str,
    play: bool,
) -> Result<(), ServiceError> {
    client
        .put_no_content(
            "/me/player",
            &[],
            Some(&json!({ "device_ids": [device_id], "play": play })),
        )
        .await
}

/// Starts playback of a single track at a position, returning the device id
/// the command was sent to.
///
/// When no device id is given, the first device Spotify lists is targeted;
/// an account with no devices online cannot start playback at all.
pub async fn start_playback(
    client: &AuthorizedClient<'_>,
    track_uri: &str,
    position_ms: u64,
    device_id: Option<String>,
) -> Result<String, ServiceError> {
    let device_id = match device_id {
        Some(id) => id,
        None => first_available_device(client).await?,
    };

    client
        .put_no_content(
            "/me/player/play",
            &[("device_id", device_id.as_str())],
            Some(&json!({ "uris": [track_uri], "position_ms": position_ms })),
        )
        .await?;

    Ok(device_id)
}

/// Pauses playback, on a specific device when one is named.
pub async fn pause_playback(
    client: &AuthorizedClient<'_>,
    device_id: Option<&str>,
) -> Result<(), ServiceError> {
    let query: Vec<(&str, &str)> = device_id.into_iter().map(|id| ("device_id", id)).collect();
    client.put_no_content("/me/player/pause", &query, None).await
}

async fn first_available_device(client: &AuthorizedClient<'_>) -> Result<String, ServiceError> {
    let listed = devices(client).await?;
    // Devices in a private session report no id and cannot be targeted.
    listed
        .devices
        .into_iter()
        .next()
        .and_then(|device| device.id)
        .ok_or(ServiceError::NoActiveDevice)
}
