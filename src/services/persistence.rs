//! Versioned session save on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BotError;
use crate::models::ImageSettings;
use crate::scheduler::SchedulerStrategy;

/// Current save layout. Saves with any other version are discarded.
pub const SAVE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub version: u32,
    pub strategy: SchedulerStrategy,
    pub images: Vec<ImageSettings>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SaveData {
    pub fn new(strategy: SchedulerStrategy, images: Vec<ImageSettings>) -> Self {
        Self {
            version: SAVE_VERSION,
            strategy,
            images,
            saved_at: None,
        }
    }
}

/// Reads and writes [`SaveData`] as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the save.
    ///
    /// Returns `Ok(None)` when there is no save. A save that cannot be
    /// parsed or has another version is deleted and also yields `None`.
    pub async fn load(&self) -> Result<Option<SaveData>, BotError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let parsed = serde_json::from_str::<serde_json::Value>(&content)
            .map_err(|e| e.to_string())
            .and_then(|value| {
                let version = value.get("version").and_then(|v| v.as_u64());
                if version != Some(u64::from(SAVE_VERSION)) {
                    return Err(format!("unsupported save version {:?}", version));
                }
                serde_json::from_value::<SaveData>(value).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(data) => {
                tracing::info!(
                    path = %self.path.display(),
                    images = data.images.len(),
                    "Loaded save"
                );
                Ok(Some(data))
            }
            Err(reason) => {
                tracing::warn!(path = %self.path.display(), %reason, "Discarding unusable save");
                tokio::fs::remove_file(&self.path).await?;
                Ok(None)
            }
        }
    }

    /// Write the save atomically (temp file, then rename).
    pub async fn save(&self, data: &SaveData) -> Result<(), BotError> {
        let mut data = data.clone();
        data.version = SAVE_VERSION;
        data.saved_at = Some(Utc::now());
        let json = serde_json::to_string_pretty(&data)
            .map_err(|e| BotError::Persistence(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!(path = %self.path.display(), "Saved session");
        Ok(())
    }
}
