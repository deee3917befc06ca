use std::path::{Path, PathBuf};

use crate::{error::ServiceError, management::encode_key, types::TrackPosition};

/// Stores resume positions on disk, one document per user and track.
///
/// Positions live under `positions/<user>/<track>.json`, so writing the same
/// pair again replaces the previous record instead of accumulating history.
#[derive(Debug, Clone)]
pub struct PositionManager {
    root: PathBuf,
}

impl PositionManager {
    pub fn new(data_dir: &Path) -> Self {
        PositionManager {
            root: data_dir.join("positions"),
        }
    }

    pub async fn save(&self, position: &TrackPosition) -> Result<(), ServiceError> {
        let dir = self.user_dir(&position.user_id);
        async_fs::create_dir_all(&dir)
            .await
            .map_err(ServiceError::storage)?;

        let json = serde_json::to_string_pretty(position).map_err(ServiceError::storage)?;
        async_fs::write(self.document_path(&position.user_id, &position.track_uri), json)
            .await
            .map_err(ServiceError::storage)
    }

    /// Loads the stored position for a user and track, `None` when the pair
    /// was never saved.
    pub async fn load(
        &self,
        user_id: &str,
        track_uri: &str,
    ) -> Result<Option<TrackPosition>, ServiceError> {
        let path = self.document_path(user_id, track_uri);
        let json = match async_fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ServiceError::storage(e)),
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(ServiceError::storage)
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join(encode_key(user_id))
    }

    fn document_path(&self, user_id: &str, track_uri: &str) -> PathBuf {
        self.user_dir(user_id)
            .join(format!("{}.json", encode_key(track_uri)))
    }
}
