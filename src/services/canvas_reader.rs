//! Reading the live canvas tile by tile.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::coords::{TileCoord, WorldPosition, TILE_SIZE};
use crate::error::TransientIoError;
use crate::planner::CanvasView;

/// Palette ids of one tile, row-major, `TILE_SIZE × TILE_SIZE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileColors {
    ids: Vec<u8>,
}

impl TileColors {
    /// Returns `None` unless `ids` has exactly one entry per tile pixel.
    pub fn new(ids: Vec<u8>) -> Option<Self> {
        (ids.len() == (TILE_SIZE * TILE_SIZE) as usize).then_some(Self { ids })
    }

    /// A tile where every pixel has color `id`.
    pub fn filled(id: u8) -> Self {
        Self {
            ids: vec![id; (TILE_SIZE * TILE_SIZE) as usize],
        }
    }

    pub fn get(&self, local_x: i64, local_y: i64) -> Option<u8> {
        if !(0..TILE_SIZE).contains(&local_x) || !(0..TILE_SIZE).contains(&local_y) {
            return None;
        }
        self.ids.get((local_y * TILE_SIZE + local_x) as usize).copied()
    }

    pub fn set(&mut self, local_x: i64, local_y: i64, id: u8) {
        if (0..TILE_SIZE).contains(&local_x) && (0..TILE_SIZE).contains(&local_y) {
            self.ids[(local_y * TILE_SIZE + local_x) as usize] = id;
        }
    }
}

/// Where tiles come from.
#[async_trait]
pub trait TileSource: Send + Sync {
    async fn fetch_tile(&self, tile: TileCoord) -> Result<TileColors, TransientIoError>;
}

/// Frozen set of tiles read during the read-map phase.
#[derive(Debug, Clone, Default)]
pub struct CanvasSnapshot {
    tiles: HashMap<TileCoord, Arc<TileColors>>,
}

impl CanvasSnapshot {
    pub fn new(tiles: HashMap<TileCoord, Arc<TileColors>>) -> Self {
        Self { tiles }
    }

    pub fn contains(&self, tile: &TileCoord) -> bool {
        self.tiles.contains_key(tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

impl CanvasView for CanvasSnapshot {
    fn color_at(&self, p: &WorldPosition) -> Option<u8> {
        self.tiles.get(&p.tile())?.get(p.local_x(), p.local_y())
    }
}

/// Outcome of a prefetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    pub loaded: usize,
    pub cached: usize,
    pub failed: Vec<TileCoord>,
}

/// Live canvas access used by the session.
#[async_trait]
pub trait LiveCanvasReader: Send + Sync {
    /// Read the given tiles into the cache. Failures are reported, not
    /// returned as errors.
    async fn prefetch_tiles(&self, tiles: &[TileCoord]) -> PrefetchReport;

    /// Color at `p` from the cache.
    fn color_at(&self, p: &WorldPosition) -> Option<u8>;

    /// Freeze the cache for planning.
    fn snapshot(&self) -> CanvasSnapshot;

    /// Drop every cached tile.
    fn clear(&self);
}

/// Retry policy for tile reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub retries: u32,
    /// Delay before the first retry, doubled each time
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Tile cache in front of a [`TileSource`], with bounded retries.
pub struct CachedCanvasReader<S: TileSource> {
    source: S,
    retry: RetryPolicy,
    tiles: RwLock<HashMap<TileCoord, Arc<TileColors>>>,
}

impl<S: TileSource> CachedCanvasReader<S> {
    pub fn new(source: S, retry: RetryPolicy) -> Self {
        Self {
            source,
            retry,
            tiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn cached(&self, tile: &TileCoord) -> bool {
        self.tiles
            .read()
            .map(|tiles| tiles.contains_key(tile))
            .unwrap_or(false)
    }

    async fn fetch_with_retry(&self, tile: TileCoord) -> Result<TileColors, TransientIoError> {
        let mut delay = self.retry.backoff;
        let mut attempt = 0;
        loop {
            match self.source.fetch_tile(tile).await {
                Ok(colors) => return Ok(colors),
                Err(e) if attempt < self.retry.retries => {
                    attempt += 1;
                    tracing::debug!(%tile, attempt, error = %e, ?delay, "Tile read failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<S: TileSource> LiveCanvasReader for CachedCanvasReader<S> {
    async fn prefetch_tiles(&self, tiles: &[TileCoord]) -> PrefetchReport {
        let mut report = PrefetchReport::default();
        let mut wanted = Vec::new();
        for tile in tiles {
            if self.cached(tile) || wanted.contains(tile) {
                report.cached += 1;
            } else {
                wanted.push(*tile);
            }
        }

        let results = join_all(wanted.iter().map(|&tile| self.fetch_with_retry(tile))).await;

        let mut loaded = HashMap::new();
        for (tile, result) in wanted.into_iter().zip(results) {
            match result {
                Ok(colors) => {
                    loaded.insert(tile, Arc::new(colors));
                }
                Err(e) => {
                    tracing::warn!(%tile, error = %e, "Giving up on tile, its cells are skipped");
                    report.failed.push(tile);
                }
            }
        }
        report.loaded = loaded.len();
        if let Ok(mut cache) = self.tiles.write() {
            cache.extend(loaded);
        }
        tracing::info!(
            loaded = report.loaded,
            cached = report.cached,
            failed = report.failed.len(),
            "Read canvas tiles"
        );
        report
    }

    fn color_at(&self, p: &WorldPosition) -> Option<u8> {
        let tiles = self.tiles.read().ok()?;
        tiles.get(&p.tile())?.get(p.local_x(), p.local_y())
    }

    fn snapshot(&self) -> CanvasSnapshot {
        let tiles = self
            .tiles
            .read()
            .map(|tiles| tiles.clone())
            .unwrap_or_default();
        CanvasSnapshot::new(tiles)
    }

    fn clear(&self) {
        if let Ok(mut tiles) = self.tiles.write() {
            tiles.clear();
        }
    }
}
