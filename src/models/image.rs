//! Images placed on the canvas.

use std::sync::Arc;

use palette_match::{
    quantize, target_height, Bitmap, ColorMatcher, DemandTable, QuantizeError, QuantizeOptions,
    QuantizedGrid, EXACT_GRID_SIZE,
};
use serde::{Deserialize, Serialize};

use super::filter::ColorFilter;
use crate::coords::{TileCoord, WorldPosition};
use crate::planner::TraversalStrategy;

/// Persisted settings of a placed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    /// Path or URL the bitmap was loaded from
    pub source: String,
    /// World position of the top-left cell
    pub position: WorldPosition,
    /// Width in cells; height follows the aspect ratio
    pub width: usize,
    #[serde(default)]
    pub brightness: f64,
    #[serde(default)]
    pub exact_color: bool,
    #[serde(default)]
    pub strategy: TraversalStrategy,
    /// Also paint transparent cells, erasing what is on the canvas
    #[serde(default)]
    pub draw_transparent: bool,
    /// Paint colors grouped in filter order
    #[serde(default)]
    pub draw_colors_in_order: bool,
    #[serde(default)]
    pub lock: bool,
    #[serde(default)]
    pub colors: ColorFilter,
}

impl ImageSettings {
    pub fn new(source: impl Into<String>, position: WorldPosition, width: usize) -> Self {
        Self {
            source: source.into(),
            position,
            width,
            brightness: 0.0,
            exact_color: false,
            strategy: TraversalStrategy::default(),
            draw_transparent: false,
            draw_colors_in_order: false,
            lock: false,
            colors: ColorFilter::default(),
        }
    }
}

/// Quantization result shared with planners.
#[derive(Debug)]
pub struct Quantized {
    pub grid: QuantizedGrid,
    pub demand: DemandTable,
}

/// An image on the canvas: settings, source bitmap and the lazily rebuilt
/// grid.
#[derive(Debug, Clone)]
pub struct PlacedImage {
    settings: ImageSettings,
    bitmap: Arc<Bitmap>,
    quantized: Option<Arc<Quantized>>,
}

impl PlacedImage {
    pub fn new(settings: ImageSettings, bitmap: Bitmap) -> Self {
        Self {
            settings,
            bitmap: Arc::new(bitmap),
            quantized: None,
        }
    }

    pub fn settings(&self) -> &ImageSettings {
        &self.settings
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn position(&self) -> WorldPosition {
        self.settings.position
    }

    /// Width and height of the grid the current settings produce.
    pub fn grid_size(&self) -> (usize, usize) {
        if self.settings.exact_color {
            return (EXACT_GRID_SIZE, EXACT_GRID_SIZE);
        }
        let height = target_height(
            self.bitmap.width(),
            self.bitmap.height(),
            self.settings.width,
        );
        (self.settings.width, height)
    }

    /// Tiles touched by the image's grid, sorted.
    pub fn tiles(&self) -> Vec<TileCoord> {
        let (width, height) = self.grid_size();
        if width == 0 || height == 0 {
            return Vec::new();
        }
        let origin = self.settings.position;
        let last = origin.offset(width as i64 - 1, height as i64 - 1);
        let mut tiles = Vec::new();
        for ty in origin.tile_y()..=last.tile_y() {
            for tx in origin.tile_x()..=last.tile_x() {
                let tile = TileCoord::new(tx, ty);
                if tile.in_world() {
                    tiles.push(tile);
                }
            }
        }
        tiles
    }

    pub fn set_width(&mut self, width: usize) {
        if self.settings.width != width {
            self.settings.width = width;
            self.quantized = None;
        }
    }

    pub fn set_brightness(&mut self, brightness: f64) {
        if self.settings.brightness != brightness {
            self.settings.brightness = brightness;
            self.quantized = None;
        }
    }

    pub fn set_position(&mut self, position: WorldPosition) {
        self.settings.position = position;
    }

    pub fn set_strategy(&mut self, strategy: TraversalStrategy) {
        self.settings.strategy = strategy;
    }

    pub fn set_draw_transparent(&mut self, draw_transparent: bool) {
        self.settings.draw_transparent = draw_transparent;
    }

    pub fn set_draw_colors_in_order(&mut self, in_order: bool) {
        self.settings.draw_colors_in_order = in_order;
    }

    pub fn set_lock(&mut self, lock: bool) {
        self.settings.lock = lock;
    }

    pub fn colors_mut(&mut self) -> &mut ColorFilter {
        &mut self.settings.colors
    }

    /// Drop the grid, e.g. after the palette changed.
    pub fn invalidate(&mut self) {
        self.quantized = None;
    }

    /// Current grid, if it is up to date.
    pub fn quantized(&self) -> Option<&Arc<Quantized>> {
        self.quantized.as_ref()
    }

    /// Rebuild the grid when stale and return it.
    ///
    /// Regenerates the color filter when the set of colors changed.
    pub fn ensure_quantized(
        &mut self,
        matcher: &mut ColorMatcher,
    ) -> Result<Arc<Quantized>, QuantizeError> {
        if let Some(q) = &self.quantized {
            return Ok(Arc::clone(q));
        }

        let options = QuantizeOptions {
            target_width: self.settings.width,
            brightness: self.settings.brightness,
            exact: self.settings.exact_color,
        };
        let (grid, demand) = quantize(&self.bitmap, &options, matcher)?;
        if self.settings.colors.regenerate(&demand) {
            tracing::debug!(
                source = %self.settings.source,
                colors = self.settings.colors.len(),
                "Color filter regenerated"
            );
        }

        let q = Arc::new(Quantized { grid, demand });
        self.quantized = Some(Arc::clone(&q));
        Ok(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette_match::Palette;

    fn image(width: usize, bitmap: Bitmap) -> PlacedImage {
        PlacedImage::new(
            ImageSettings::new("test.png", WorldPosition::new(1990, 500), width),
            bitmap,
        )
    }

    fn matcher() -> ColorMatcher {
        ColorMatcher::new(Palette::from_hex(&["#000000", "#ffffff"]).unwrap())
    }

    #[test]
    fn test_grid_size_follows_aspect() {
        let img = image(20, Bitmap::filled(40, 10, [0, 0, 0, 255]));
        assert_eq!(img.grid_size(), (20, 5));
    }

    #[test]
    fn test_tiles_spanning_boundary() {
        let img = image(20, Bitmap::filled(40, 10, [0, 0, 0, 255]));
        assert_eq!(
            img.tiles(),
            vec![TileCoord::new(1, 0), TileCoord::new(2, 0)]
        );
    }

    #[test]
    fn test_quantize_is_cached_until_settings_change() {
        let mut img = image(2, Bitmap::filled(4, 4, [255, 255, 255, 255]));
        let mut matcher = matcher();

        let first = img.ensure_quantized(&mut matcher).unwrap();
        let again = img.ensure_quantized(&mut matcher).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(img.settings().colors.len(), 1);

        img.set_width(1);
        assert!(img.quantized().is_none());
        let resized = img.ensure_quantized(&mut matcher).unwrap();
        assert_eq!(resized.grid.len(), 1);
    }

    #[test]
    fn test_brightness_change_regenerates_filter() {
        let mut img = image(1, Bitmap::filled(1, 1, [128, 128, 128, 255]));
        let mut matcher = matcher();
        img.ensure_quantized(&mut matcher).unwrap();
        assert_eq!(img.settings().colors.entries()[0].id, 2);

        img.set_brightness(-0.5);
        img.ensure_quantized(&mut matcher).unwrap();
        assert_eq!(img.settings().colors.len(), 1);
        assert_eq!(img.settings().colors.entries()[0].id, 1);
    }

    #[test]
    fn test_settings_json_shape() {
        let settings = ImageSettings::new("a.png", WorldPosition::from_tile(1, 2, 3, 4).unwrap(), 10);
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["position"], serde_json::json!([1, 2, 3, 4]));
        assert_eq!(json["strategy"], "RANDOM");
        assert_eq!(json["drawTransparent"], false);
    }
}
