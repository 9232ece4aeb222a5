//! Test fixtures and constants.

use std::sync::Arc;
use std::time::Duration;

use palette_match::{canvas_palette, Bitmap, Palette, Rgba, CLEAR};
use tileplan::coords::{Anchor, AnchorSet, ScreenPosition, WorldPosition};
use tileplan::models::{ImageSettings, PlacedImage};
use tileplan::planner::TraversalStrategy;
use tileplan::scheduler::SchedulerStrategy;
use tileplan::services::{
    encode_png, CachedCanvasReader, HttpTileSource, PaintActuator, RetryPolicy, Services,
    SessionSettings, StaticCalibrationSource, StaticPaletteSource,
};

/// Canvas swatches with their palette ids
pub mod colors {
    use palette_match::Rgba;

    pub const BLACK: Rgba = [0, 0, 0, 255];
    pub const BLACK_ID: u8 = 1;

    pub const WHITE: Rgba = [255, 255, 255, 255];
    pub const WHITE_ID: u8 = 5;
}

/// Two anchors one world pixel to one screen pixel, origin at (0,0).
pub fn anchors() -> AnchorSet {
    AnchorSet::new(vec![
        Anchor::new(WorldPosition::new(0, 0), ScreenPosition::new(0.0, 0.0)),
        Anchor::new(WorldPosition::new(100, 0), ScreenPosition::new(100.0, 0.0)),
    ])
}

/// Tile PNG of `width × height` transparent pixels with a few painted ones.
pub fn tile_png(width: usize, height: usize, painted: &[(usize, usize, Rgba)]) -> Vec<u8> {
    let mut bitmap = Bitmap::filled(width, height, CLEAR);
    for &(x, y, color) in painted {
        bitmap.set_pixel(x, y, color);
    }
    encode_png(&bitmap).expect("encode tile")
}

/// Square single-color image walked top-down.
pub fn solid_image(source: &str, position: WorldPosition, size: usize, color: Rgba) -> PlacedImage {
    let mut settings = ImageSettings::new(source, position, size);
    settings.strategy = TraversalStrategy::Down;
    PlacedImage::new(settings, Bitmap::filled(size, size, color))
}

/// Fast retries for tests.
pub fn quick_retry() -> RetryPolicy {
    RetryPolicy {
        retries: 1,
        backoff: Duration::from_millis(5),
    }
}

pub fn session_settings(strategy: SchedulerStrategy) -> SessionSettings {
    SessionSettings {
        strategy,
        min_anchor_separation: 10,
        pixels_per_hour: 120.0,
    }
}

/// Services reading tiles from `tile_url`, every color available.
pub fn http_services(
    tile_url: &str,
    actuator: Arc<dyn PaintActuator>,
    calibration: Arc<StaticCalibrationSource>,
) -> Services {
    let palette = Palette::new(canvas_palette()).expect("canvas palette");
    let tiles = HttpTileSource::new(tile_url, palette).expect("http client");
    Services {
        palette: Arc::new(StaticPaletteSource::default()),
        canvas: Arc::new(CachedCanvasReader::new(tiles, quick_retry())),
        actuator,
        calibration,
    }
}
