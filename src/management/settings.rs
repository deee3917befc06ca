use std::path::{Path, PathBuf};

use crate::{error::ServiceError, management::encode_key, types::TimerSettings};

/// Stores one timer settings document per user on disk.
///
/// Saving is a full replace: the newest document supersedes whatever was
/// there before, so a load never mixes fields from different saves.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    root: PathBuf,
}

impl SettingsManager {
    pub fn new(data_dir: &Path) -> Self {
        SettingsManager {
            root: data_dir.join("settings"),
        }
    }

    pub async fn save(&self, settings: &TimerSettings) -> Result<(), ServiceError> {
        async_fs::create_dir_all(&self.root)
            .await
            .map_err(ServiceError::storage)?;

        let json = serde_json::to_string_pretty(settings).map_err(ServiceError::storage)?;
        async_fs::write(self.document_path(&settings.user_id), json)
            .await
            .map_err(ServiceError::storage)
    }

    /// Loads the settings document for a user, `None` when nothing was saved.
    pub async fn load(&self, user_id: &str) -> Result<Option<TimerSettings>, ServiceError> {
        let path = self.document_path(user_id);
        let json = match async_fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ServiceError::storage(e)),
        };

        serde_json::from_str(&json)
            .map(Some)
            .map_err(ServiceError::storage)
    }

    fn document_path(&self, user_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(user_id)))
    }
}
