//! World positions and tile decomposition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side length of a canvas tile in world pixels.
pub const TILE_SIZE: i64 = 1000;

/// Number of tiles along each world axis.
pub const WORLD_TILES: i64 = 2048;

/// Side length of the world in pixels.
pub const WORLD_SIZE: i64 = TILE_SIZE * WORLD_TILES;

/// Tile address on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i64,
    pub y: i64,
}

impl TileCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// True when the tile exists on the canvas.
    pub fn in_world(&self) -> bool {
        (0..WORLD_TILES).contains(&self.x) && (0..WORLD_TILES).contains(&self.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// Absolute pixel position in the world.
///
/// Stored as global coordinates; the tile and in-tile parts are derived
/// with Euclidean division, so `tile_x() * TILE_SIZE + local_x() == x` and
/// `0 <= local_x() < TILE_SIZE` always hold. Serialized as
/// `[tileX, tileY, x, y]`; tuples whose global coordinates do not fit in
/// an `i64` are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i64; 4]", into = "[i64; 4]")]
pub struct WorldPosition {
    pub x: i64,
    pub y: i64,
}

impl WorldPosition {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Position from a tile address plus an offset inside it, or `None`
    /// when the global coordinates overflow.
    pub const fn from_tile(tile_x: i64, tile_y: i64, local_x: i64, local_y: i64) -> Option<Self> {
        let Some(x) = global(tile_x, local_x) else {
            return None;
        };
        let Some(y) = global(tile_y, local_y) else {
            return None;
        };
        Some(Self { x, y })
    }

    #[inline]
    pub fn tile_x(&self) -> i64 {
        self.x.div_euclid(TILE_SIZE)
    }

    #[inline]
    pub fn tile_y(&self) -> i64 {
        self.y.div_euclid(TILE_SIZE)
    }

    #[inline]
    pub fn local_x(&self) -> i64 {
        self.x.rem_euclid(TILE_SIZE)
    }

    #[inline]
    pub fn local_y(&self) -> i64 {
        self.y.rem_euclid(TILE_SIZE)
    }

    pub fn tile(&self) -> TileCoord {
        TileCoord::new(self.tile_x(), self.tile_y())
    }

    /// Move to another tile, keeping the in-tile offset.
    pub fn set_tile_x(&mut self, tile_x: i64) {
        self.x = tile_x * TILE_SIZE + self.local_x();
    }

    /// Move to another tile, keeping the in-tile offset.
    pub fn set_tile_y(&mut self, tile_y: i64) {
        self.y = tile_y * TILE_SIZE + self.local_y();
    }

    /// Change the in-tile offset, keeping the tile. Offsets outside
    /// `0..TILE_SIZE` spill into neighbouring tiles.
    pub fn set_local_x(&mut self, local_x: i64) {
        self.x = self.tile_x() * TILE_SIZE + local_x;
    }

    /// Change the in-tile offset, keeping the tile. Offsets outside
    /// `0..TILE_SIZE` spill into neighbouring tiles.
    pub fn set_local_y(&mut self, local_y: i64) {
        self.y = self.tile_y() * TILE_SIZE + local_y;
    }

    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// True when the position lies on the canvas.
    pub fn in_world(&self) -> bool {
        (0..WORLD_SIZE).contains(&self.x) && (0..WORLD_SIZE).contains(&self.y)
    }

    /// Manhattan distance to `other`.
    pub fn manhattan(&self, other: &WorldPosition) -> i64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

const fn global(tile: i64, local: i64) -> Option<i64> {
    match tile.checked_mul(TILE_SIZE) {
        Some(base) => base.checked_add(local),
        None => None,
    }
}

impl TryFrom<[i64; 4]> for WorldPosition {
    type Error = String;

    fn try_from([tile_x, tile_y, x, y]: [i64; 4]) -> Result<Self, Self::Error> {
        Self::from_tile(tile_x, tile_y, x, y)
            .ok_or_else(|| format!("position [{tile_x}, {tile_y}, {x}, {y}] overflows"))
    }
}

impl From<WorldPosition> for [i64; 4] {
    fn from(p: WorldPosition) -> Self {
        [p.tile_x(), p.tile_y(), p.local_x(), p.local_y()]
    }
}

impl fmt::Display for WorldPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}, {})",
            self.tile_x(),
            self.tile_y(),
            self.local_x(),
            self.local_y()
        )
    }
}
