use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::image::ImageSettings;
use crate::coords::{Anchor, DEFAULT_MIN_SEPARATION};
use crate::error::ConfigurationError;
use crate::scheduler::SchedulerStrategy;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Tile PNG URL with `{x}` and `{y}` placeholders
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    /// Palette ids that can be painted. `None` means all of them.
    #[serde(default)]
    pub available_colors: Option<Vec<u8>>,

    /// Calibration anchors
    #[serde(default)]
    pub anchors: Vec<Anchor>,

    /// Minimum X distance between the two anchors of a transform
    #[serde(default = "default_min_anchor_separation")]
    pub min_anchor_separation: i64,

    /// Upper bound for resolving one calibration click
    #[serde(default = "default_calibration_timeout")]
    pub calibration_timeout_secs: u64,

    /// Extra attempts per tile after the first failure
    #[serde(default = "default_tile_retries")]
    pub tile_retries: u32,

    /// Delay before the first retry, doubled after each attempt
    #[serde(default = "default_tile_backoff")]
    pub tile_backoff_ms: u64,

    /// How tasks of several images are interleaved
    #[serde(default)]
    pub strategy: SchedulerStrategy,

    /// Where session state is saved
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    /// Recharge rate used for the ETA
    #[serde(default = "default_pixels_per_hour")]
    pub pixels_per_hour: f64,

    /// Images used when there is no save yet
    #[serde(default)]
    pub images: Vec<ImageSettings>,
}

fn default_tile_url() -> String {
    "https://backend.wplace.live/files/s0/tiles/{x}/{y}.png".to_string()
}

fn default_min_anchor_separation() -> i64 {
    DEFAULT_MIN_SEPARATION
}

fn default_calibration_timeout() -> u64 {
    30
}

fn default_tile_retries() -> u32 {
    3
}

fn default_tile_backoff() -> u64 {
    500
}

fn default_save_path() -> PathBuf {
    PathBuf::from("tileplan-save.json")
}

fn default_pixels_per_hour() -> f64 {
    120.0
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content).unwrap_or_else(|e| {
                tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        tracing::info!(
            anchors = config.anchors.len(),
            images = config.images.len(),
            strategy = %config.strategy,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Reject settings that cannot work at all.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.tile_url.contains("{x}") || !self.tile_url.contains("{y}") {
            return Err(ConfigurationError::Invalid(format!(
                "tile_url must contain {{x}} and {{y}}: {}",
                self.tile_url
            )));
        }
        if !(self.pixels_per_hour > 0.0) {
            return Err(ConfigurationError::Invalid(
                "pixels_per_hour must be positive".to_string(),
            ));
        }
        if self.min_anchor_separation < 1 {
            return Err(ConfigurationError::Invalid(
                "min_anchor_separation must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn calibration_timeout(&self) -> Duration {
        Duration::from_secs(self.calibration_timeout_secs)
    }

    pub fn tile_backoff(&self) -> Duration {
        Duration::from_millis(self.tile_backoff_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tile_url: default_tile_url(),
            available_colors: None,
            anchors: Vec::new(),
            min_anchor_separation: default_min_anchor_separation(),
            calibration_timeout_secs: default_calibration_timeout(),
            tile_retries: default_tile_retries(),
            tile_backoff_ms: default_tile_backoff(),
            strategy: SchedulerStrategy::default(),
            save_path: default_save_path(),
            pixels_per_hour: default_pixels_per_hour(),
            images: Vec::new(),
        }
    }
}
