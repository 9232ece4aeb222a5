//! Canvas tiles over HTTP.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use palette_match::{quantize, ColorMatcher, Palette, QuantizeOptions};

use super::canvas_reader::{TileColors, TileSource};
use super::png_codec::decode_png;
use crate::coords::TileCoord;
use crate::error::TransientIoError;

/// Fetches tile PNGs and reads them into palette ids.
pub struct HttpTileSource {
    client: reqwest::Client,
    url_template: String,
    matcher: Mutex<ColorMatcher>,
}

impl HttpTileSource {
    /// `url_template` must contain `{x}` and `{y}`.
    pub fn new(url_template: impl Into<String>, palette: Palette) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("tileplan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
            matcher: Mutex::new(ColorMatcher::new(palette)),
        })
    }

    /// Use a new palette for reading tiles.
    pub fn set_palette(&self, palette: Palette) {
        if let Ok(mut matcher) = self.matcher.lock() {
            matcher.set_palette(palette);
        }
    }

    pub fn url_for(&self, tile: TileCoord) -> String {
        self.url_template
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    fn read_tile(&self, tile: TileCoord, bytes: &[u8]) -> Result<TileColors, TransientIoError> {
        let decode_error = |message: String| TransientIoError::Decode { tile, message };

        let bitmap = decode_png(bytes).map_err(|e| decode_error(e.to_string()))?;
        let mut matcher = self
            .matcher
            .lock()
            .map_err(|_| decode_error("color matcher poisoned".to_string()))?;
        let (grid, _) = quantize(&bitmap, &QuantizeOptions::exact(), &mut matcher)
            .map_err(|e| decode_error(e.to_string()))?;
        TileColors::new(grid.ideal_ids().to_vec())
            .ok_or_else(|| decode_error("unexpected tile size".to_string()))
    }
}

#[async_trait]
impl TileSource for HttpTileSource {
    async fn fetch_tile(&self, tile: TileCoord) -> Result<TileColors, TransientIoError> {
        let url = self.url_for(tile);
        tracing::debug!(%tile, %url, "Fetching tile");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransientIoError::Request {
                tile,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // Nobody has painted this tile yet
            return Ok(TileColors::filled(palette_match::TRANSPARENT_ID));
        }
        if !status.is_success() {
            return Err(TransientIoError::Status {
                tile,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransientIoError::Request {
                tile,
                message: e.to_string(),
            })?;
        self.read_tile(tile, &bytes)
    }
}
