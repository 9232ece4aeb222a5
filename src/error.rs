use std::time::Duration;

use palette_match::{PaletteError, QuantizeError};
use thiserror::Error;

use crate::coords::TileCoord;

/// Fatal setup problems. Retrying without changing the input will not help.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Image error: {0}")]
    Image(#[from] QuantizeError),

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Coordinate system problems the user can fix by calibrating again.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Not calibrated: {anchors} anchor(s) set, at least 2 required")]
    NotCalibrated { anchors: usize },

    #[error("Anchors too close: {separation} px apart on X, need at least {min}")]
    AnchorsTooClose { separation: i64, min: i64 },

    #[error("Calibration timed out after {0:?}")]
    Timeout(Duration),

    #[error("Calibration source error: {0}")]
    Source(String),

    #[error("Calibration cancelled")]
    Cancelled,
}

/// Tile read failures. Retried with backoff; a tile that keeps failing is
/// skipped.
#[derive(Debug, Error)]
pub enum TransientIoError {
    #[error("Tile {tile} request failed: {message}")]
    Request { tile: TileCoord, message: String },

    #[error("Tile {tile} returned HTTP {status}")]
    Status { tile: TileCoord, status: u16 },

    #[error("Tile {tile} could not be decoded: {message}")]
    Decode { tile: TileCoord, message: String },
}

impl TransientIoError {
    pub fn tile(&self) -> TileCoord {
        match self {
            TransientIoError::Request { tile, .. }
            | TransientIoError::Status { tile, .. }
            | TransientIoError::Decode { tile, .. } => *tile,
        }
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Canvas read error: {0}")]
    TransientIo(#[from] TransientIoError),

    #[error("Paint failed: {0}")]
    Paint(String),

    #[error("Save error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PaletteError> for BotError {
    fn from(e: PaletteError) -> Self {
        BotError::Configuration(e.into())
    }
}

impl From<QuantizeError> for BotError {
    fn from(e: QuantizeError) -> Self {
        BotError::Configuration(e.into())
    }
}

impl BotError {
    /// Short status line for the user.
    pub fn status(&self) -> String {
        match self {
            BotError::Configuration(e) => format!("Setup problem: {}", e),
            BotError::Calibration(CalibrationError::NotCalibrated { .. }) => {
                "Not calibrated: set at least two anchors".to_string()
            }
            BotError::Calibration(CalibrationError::AnchorsTooClose { .. }) => {
                "Anchors too close together: pick anchors further apart".to_string()
            }
            BotError::Calibration(CalibrationError::Timeout(_)) => {
                "Calibration timed out: try again".to_string()
            }
            BotError::Calibration(CalibrationError::Cancelled) => "Calibration cancelled".to_string(),
            BotError::Calibration(e) => format!("Calibration failed: {}", e),
            BotError::TransientIo(e) => format!("Could not read canvas: {}", e),
            BotError::Paint(_) => "Painting failed, stopped".to_string(),
            BotError::Persistence(_) => "Could not save progress".to_string(),
            BotError::Io(_) | BotError::Internal(_) => "Unexpected error, see log".to_string(),
        }
    }

    /// True for errors that should be logged in full.
    pub fn is_unexpected(&self) -> bool {
        matches!(self, BotError::Io(_) | BotError::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_error_messages() {
        let error = CalibrationError::NotCalibrated { anchors: 1 };
        assert_eq!(
            error.to_string(),
            "Not calibrated: 1 anchor(s) set, at least 2 required"
        );

        let error = CalibrationError::AnchorsTooClose {
            separation: 4,
            min: 10,
        };
        assert_eq!(
            error.to_string(),
            "Anchors too close: 4 px apart on X, need at least 10"
        );
    }

    #[test]
    fn test_transient_error_message_and_tile() {
        let error = TransientIoError::Status {
            tile: TileCoord::new(12, 34),
            status: 503,
        };
        assert_eq!(error.to_string(), "Tile 12/34 returned HTTP 503");
        assert_eq!(error.tile(), TileCoord::new(12, 34));
    }

    #[test]
    fn test_bot_error_from_palette_error() {
        let error: BotError = PaletteError::EmptyPalette.into();
        match error {
            BotError::Configuration(ConfigurationError::Palette(_)) => {}
            other => panic!("Expected palette configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_bot_error_status_lines() {
        let error = BotError::Calibration(CalibrationError::AnchorsTooClose {
            separation: 0,
            min: 10,
        });
        assert_eq!(
            error.status(),
            "Anchors too close together: pick anchors further apart"
        );
        assert!(!error.is_unexpected());

        let error = BotError::Internal("boom".to_string());
        assert_eq!(error.status(), "Unexpected error, see log");
        assert!(error.is_unexpected());

        let error = BotError::Configuration(ConfigurationError::Invalid("no images".into()));
        assert_eq!(
            error.status(),
            "Setup problem: Invalid configuration: no images"
        );
    }
}
