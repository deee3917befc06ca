use std::path::Path;

use chrono::Utc;
use spotitimer::{
    management::{PositionManager, SettingsManager},
    types::{TimerSettings, Track, TrackPosition},
};
use uuid::Uuid;

// Helper function to create a test settings document
fn sample_settings(user_id: &str, minutes: f64, track_count: usize) -> TimerSettings {
    let selected_tracks = (0..track_count)
        .map(|i| Track {
            id: format!("track-{i}"),
            name: format!("Track {i}"),
            uri: format!("spotify:track:track-{i}"),
            duration_ms: 180000,
            artists: Vec::new(),
            album: None,
        })
        .collect();

    TimerSettings {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        timer_duration_minutes: minutes,
        play_duration_seconds: 30,
        selected_tracks,
        created_at: Utc::now(),
    }
}

// Helper function to create a test position document
fn sample_position(user_id: &str, track_uri: &str, position_ms: u64) -> TrackPosition {
    TrackPosition {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        track_uri: track_uri.to_string(),
        current_position_ms: position_ms,
        last_played_at: Utc::now(),
    }
}

fn file_count(path: &Path) -> usize {
    std::fs::read_dir(path).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsManager::new(dir.path());

    let settings = sample_settings("user-1", 25.0, 2);
    store.save(&settings).await.unwrap();

    let loaded = store.load("user-1").await.unwrap().unwrap();
    assert_eq!(loaded.id, settings.id);
    assert_eq!(loaded.timer_duration_minutes, 25.0);
    assert_eq!(loaded.selected_tracks.len(), 2);
    assert_eq!(loaded.created_at, settings.created_at);
}

#[tokio::test]
async fn test_settings_absent_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsManager::new(dir.path());

    let loaded = store.load("never-saved").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_settings_save_is_full_replace() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsManager::new(dir.path());

    store.save(&sample_settings("user-1", 30.0, 2)).await.unwrap();
    let replacement = sample_settings("user-1", 0.5, 1);
    store.save(&replacement).await.unwrap();

    // The newest document wins wholesale; no fields from the first survive
    let loaded = store.load("user-1").await.unwrap().unwrap();
    assert_eq!(loaded.id, replacement.id);
    assert_eq!(loaded.timer_duration_minutes, 0.5);
    assert_eq!(loaded.selected_tracks.len(), 1);

    // And there is exactly one document for the user on disk
    assert_eq!(file_count(&dir.path().join("settings")), 1);
}

#[tokio::test]
async fn test_position_upsert_keeps_single_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = PositionManager::new(dir.path());

    store
        .save(&sample_position("user-1", "spotify:track:abc", 10000))
        .await
        .unwrap();
    store
        .save(&sample_position("user-1", "spotify:track:abc", 95000))
        .await
        .unwrap();

    let loaded = store
        .load("user-1", "spotify:track:abc")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.current_position_ms, 95000);

    // One user directory containing one document for the pair
    let positions_root = dir.path().join("positions");
    let user_dirs: Vec<_> = std::fs::read_dir(&positions_root)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(user_dirs.len(), 1);
    assert_eq!(file_count(&user_dirs[0].path()), 1);
}

#[tokio::test]
async fn test_position_absent_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = PositionManager::new(dir.path());

    let loaded = store.load("user-1", "spotify:track:none").await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_positions_isolated_per_track() {
    let dir = tempfile::tempdir().unwrap();
    let store = PositionManager::new(dir.path());

    store
        .save(&sample_position("user-1", "spotify:track:one", 1000))
        .await
        .unwrap();
    store
        .save(&sample_position("user-1", "spotify:track:two", 2000))
        .await
        .unwrap();

    let one = store.load("user-1", "spotify:track:one").await.unwrap().unwrap();
    let two = store.load("user-1", "spotify:track:two").await.unwrap().unwrap();
    assert_eq!(one.current_position_ms, 1000);
    assert_eq!(two.current_position_ms, 2000);
}

#[tokio::test]
async fn test_keys_with_separators_stay_inside_store() {
    let dir = tempfile::tempdir().unwrap();
    let settings_store = SettingsManager::new(dir.path());
    let position_store = PositionManager::new(dir.path());

    // Ids arrive from the network and may contain anything
    let weird_user = "../../outside/store";
    let weird_uri = "spotify:track:with/slashes";

    settings_store
        .save(&sample_settings(weird_user, 30.0, 0))
        .await
        .unwrap();
    position_store
        .save(&sample_position(weird_user, weird_uri, 500))
        .await
        .unwrap();

    // Both documents are retrievable and landed inside the store directories
    assert!(settings_store.load(weird_user).await.unwrap().is_some());
    assert!(
        position_store
            .load(weird_user, weird_uri)
            .await
            .unwrap()
            .is_some()
    );
    assert_eq!(file_count(&dir.path().join("settings")), 1);
    assert!(!dir.path().join("outside").exists());
}
