use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    api,
    config::AppConfig,
    error,
    management::{PositionManager, SettingsManager},
    spotify::{SpotifyApi, SpotifyAuth},
    success,
};

/// Shared state handed to every route handler.
///
/// Everything in here is cheap to clone: the config sits behind an `Arc` and
/// the two HTTP components share their connection pool through `reqwest`'s
/// internal reference counting. No locks; the service keeps no mutable
/// in-process state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: SpotifyAuth,
    pub api: SpotifyApi,
    pub settings: SettingsManager,
    pub positions: PositionManager,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let auth = SpotifyAuth::new(&config);
        let api = SpotifyApi::new(config.api_base_url.clone(), config.request_timeout);
        let settings = SettingsManager::new(&config.data_dir);
        let positions = PositionManager::new(&config.data_dir);

        AppState {
            config: Arc::new(config),
            auth,
            api,
            settings,
            positions,
        }
    }
}

pub fn router(state: AppState) -> Router {
    // The browser frontend lives on another origin, so CORS stays wide open.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/auth/login", get(api::login))
        .route("/auth/callback", get(api::callback))
        .route("/auth/refresh", post(api::refresh))
        .route("/spotify/user", get(api::user_profile))
        .route("/spotify/search", get(api::search_tracks))
        .route("/spotify/search-playlists", get(api::search_playlists))
        .route("/spotify/devices", get(api::devices))
        .route("/spotify/playback", get(api::playback_state))
        .route("/spotify/transfer-playback", put(api::transfer_playback))
        .route("/spotify/play", post(api::play))
        .route("/spotify/pause", post(api::pause))
        .route("/timer/settings", post(api::save_settings))
        .route("/timer/settings/{user_id}", get(api::get_settings))
        .route("/timer/track-position", post(api::save_position))
        .route("/timer/track-position/{user_id}/{track_uri}", get(api::get_position))
        .layer(cors)
        .with_state(state)
}

pub async fn start_api_server(address: &str, state: AppState) {
    let app = router(state);

    let addr = match SocketAddr::from_str(address) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    success!("Listening on http://{}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server terminated: {}", e);
    }
}
